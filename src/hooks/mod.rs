//! Git hook installation
//!
//! Copies the repository's hook scripts and style config from the dotfiles
//! directory into `.git/hooks`. Templated files get their placeholders
//! replaced with paths inside the hooks directory before being written.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{HookFile, HooksConfig};
use crate::git::GitOperations;

/// One installed hook file
#[derive(Debug, Clone)]
pub struct InstalledHook {
    pub name: String,
    pub path: PathBuf,
    pub templated: bool,
    pub executable: bool,
}

/// Replace every placeholder with its value resolved inside `hooks_dir`
pub fn render_template(
    content: &str,
    replacements: &BTreeMap<String, String>,
    hooks_dir: &Path,
) -> String {
    replacements
        .iter()
        .fold(content.to_string(), |text, (placeholder, relative)| {
            text.replace(placeholder, &hooks_dir.join(relative).to_string_lossy())
        })
}

/// Install every configured hook file into the repository's hooks directory
pub fn install(git: &GitOperations, config: &HooksConfig) -> Result<Vec<InstalledHook>> {
    let source_dir = git.workdir()?.join(&config.source);
    let hooks_dir = git.hooks_dir();

    config
        .files
        .iter()
        .map(|hook| install_one(git, hook, &source_dir, &hooks_dir))
        .collect()
}

fn install_one(
    git: &GitOperations,
    hook: &HookFile,
    source_dir: &Path,
    hooks_dir: &Path,
) -> Result<InstalledHook> {
    let source = source_dir.join(&hook.file);
    if !source.is_file() {
        anyhow::bail!("Hook source file not found: {}", source.display());
    }

    let content = if hook.copy {
        fs::read(&source).with_context(|| format!("Failed to read {}", source.display()))?
    } else {
        let template = fs::read_to_string(&source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        render_template(&template, &hook.replacements, hooks_dir).into_bytes()
    };

    tracing::debug!("Installing {} into {}", hook.file, hooks_dir.display());
    let path = git.install_hook_file(&hook.file, &content, hook.exec)?;

    Ok(InstalledHook {
        name: hook.file.clone(),
        path,
        templated: !hook.copy,
        executable: hook.exec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IonToolsConfig;
    use git2::Repository;
    use tempfile::TempDir;

    fn repo_with_dotfiles() -> Result<(TempDir, GitOperations)> {
        let temp_dir = TempDir::new()?;
        Repository::init(temp_dir.path())?;

        let dotfiles = temp_dir.path().join("dotfiles");
        fs::create_dir(&dotfiles)?;
        fs::write(
            dotfiles.join("pre-commit-uncrustify"),
            "#!/bin/sh\nuncrustify -c %CONFIG_FILE% --check\n",
        )?;
        fs::write(dotfiles.join("pre-commit"), "#!/bin/sh\nexec .git/hooks/pre-commit-uncrustify\n")?;
        fs::write(dotfiles.join("canonicalize_filename.sh"), "#!/bin/sh\n")?;
        fs::write(dotfiles.join("iondb_style.cfg"), "indent_with_tabs = 2\n")?;

        let git = GitOperations::open(temp_dir.path())?;
        Ok((temp_dir, git))
    }

    #[test]
    fn test_render_template() {
        let mut replacements = BTreeMap::new();
        replacements.insert("%CONFIG_FILE%".to_string(), "style.cfg".to_string());

        let rendered = render_template("-c %CONFIG_FILE% and %CONFIG_FILE%", &replacements, Path::new("/hooks"));
        let expected = Path::new("/hooks").join("style.cfg").to_string_lossy().into_owned();
        assert_eq!(rendered, format!("-c {expected} and {expected}"));
    }

    #[test]
    fn test_install_default_hooks() -> Result<()> {
        let (_temp_dir, git) = repo_with_dotfiles()?;
        let settings = IonToolsConfig::defaults().settings()?;

        let installed = install(&git, &settings.hooks)?;
        assert_eq!(installed.len(), 4);
        for name in ["pre-commit-uncrustify", "pre-commit", "canonicalize_filename.sh", "iondb_style.cfg"] {
            assert!(git.hook_exists(name), "{name} should be installed");
        }

        let rendered = fs::read_to_string(git.hooks_dir().join("pre-commit-uncrustify"))?;
        let config_path = git.hooks_dir().join("iondb_style.cfg");
        assert!(rendered.contains(&format!("-c {} --check", config_path.display())));
        assert!(!rendered.contains("%CONFIG_FILE%"));

        assert_eq!(
            fs::read_to_string(git.hooks_dir().join("iondb_style.cfg"))?,
            "indent_with_tabs = 2\n"
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = |name: &str| {
                fs::metadata(git.hooks_dir().join(name)).unwrap().permissions().mode() & 0o777
            };
            assert_eq!(mode("pre-commit"), 0o755);
            assert_eq!(mode("pre-commit-uncrustify"), 0o755);
            assert_eq!(mode("iondb_style.cfg") & 0o111, 0);
        }
        Ok(())
    }

    #[test]
    fn test_missing_source_names_the_file() -> Result<()> {
        let (temp_dir, git) = repo_with_dotfiles()?;
        fs::remove_file(temp_dir.path().join("dotfiles/pre-commit"))?;
        let settings = IonToolsConfig::defaults().settings()?;

        let err = install(&git, &settings.hooks).unwrap_err();
        assert!(err.to_string().contains("pre-commit"));
        Ok(())
    }
}
