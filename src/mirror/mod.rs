//! Source staging for the Arduino build
//!
//! [`mirror`] copies the top level of the source tree into a deployment
//! folder, minus files named by an ignore file. [`flatten`] walks the whole
//! tree and writes every file into one directory, rewriting includes so they
//! still resolve.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MirrorConfig;

mod flatten;

pub use flatten::{FlattenReport, Flattener, fix_c_includes};

/// What a mirror pass did
#[derive(Debug, Clone, Default)]
pub struct MirrorReport {
    /// Created an empty ignore file because none existed
    pub created_ignore_file: bool,
    pub rules: Vec<String>,
    pub copied: Vec<PathBuf>,
    pub skipped: Vec<String>,
    /// Whether a previous mirror was removed first
    pub cleaned: bool,
}

/// Read exclusion rules, creating an empty ignore file when missing.
///
/// Blank lines and lines starting with `;` are ignored. Returns the rules and
/// whether the file had to be created.
pub fn load_exclude_rules(ignore_file: &Path) -> Result<(Vec<String>, bool)> {
    match fs::read_to_string(ignore_file) {
        Ok(content) => Ok((parse_exclude_rules(&content), false)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::File::create(ignore_file)
                .with_context(|| format!("Failed to create {}", ignore_file.display()))?;
            Ok((Vec::new(), true))
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read {}", ignore_file.display()))
        }
    }
}

pub fn parse_exclude_rules(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with(';') && !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .collect()
}

/// Compile rules so that each one must match at the start of a file name
pub fn compile_rules(rules: &[String]) -> Result<Vec<Regex>> {
    rules
        .iter()
        .map(|rule| {
            Regex::new(&format!("^(?:{rule})"))
                .with_context(|| format!("Invalid exclusion rule: {rule}"))
        })
        .collect()
}

/// Replace the destination with a fresh copy of the source's top-level files
pub fn mirror(config: &MirrorConfig) -> Result<MirrorReport> {
    let (rules, created_ignore_file) = load_exclude_rules(&config.ignore_file)?;
    let matchers = compile_rules(&rules)?;

    let mut report = MirrorReport {
        created_ignore_file,
        rules,
        ..Default::default()
    };

    if config.destination.is_dir() {
        tracing::info!("Cleaning old mirror {}", config.destination.display());
        fs::remove_dir_all(&config.destination)
            .with_context(|| format!("Failed to remove {}", config.destination.display()))?;
        report.cleaned = true;
    }
    fs::create_dir_all(&config.destination)
        .with_context(|| format!("Failed to create {}", config.destination.display()))?;

    let mut entries = fs::read_dir(&config.source)
        .with_context(|| format!("Failed to read source directory: {}", config.source.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();

        // If one exclusion rule is satisfied, we skip the file
        if matchers.iter().any(|rule| rule.is_match(&name)) {
            report.skipped.push(name);
            continue;
        }
        if !entry.file_type()?.is_file() {
            tracing::debug!("Not mirroring directory {}", entry.path().display());
            continue;
        }

        let target = config.destination.join(&name);
        fs::copy(entry.path(), &target).with_context(|| {
            format!("Failed to copy {} to {}", entry.path().display(), target.display())
        })?;
        report.copied.push(target);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(base: &Path) -> MirrorConfig {
        MirrorConfig {
            source: base.join("src"),
            destination: base.join("bin/ion_deployment/src"),
            ignore_file: base.join(".makeinoignore"),
        }
    }

    #[test]
    fn test_parse_exclude_rules() {
        let rules = parse_exclude_rules("; comment\nCuTest.*\n\n   \n  test_  \n");
        assert_eq!(rules, vec!["CuTest.*", "test_"]);
    }

    #[test]
    fn test_rules_match_at_start_of_name() {
        let rules = compile_rules(&["test_".to_string()]).unwrap();
        assert!(rules[0].is_match("test_skiplist.c"));
        assert!(!rules[0].is_match("run_test_skiplist.c"));
    }

    #[test]
    fn test_invalid_rule_names_the_rule() {
        let err = compile_rules(&["(oops".to_string()]).unwrap_err();
        assert!(err.to_string().contains("(oops"));
    }

    #[test]
    fn test_mirror_creates_missing_ignore_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = config_in(temp_dir.path());
        fs::create_dir(&config.source)?;
        fs::write(config.source.join("kv_system.h"), "#define X 1\n")?;

        let report = mirror(&config)?;

        assert!(report.created_ignore_file);
        assert!(config.ignore_file.is_file());
        assert!(!report.cleaned);
        assert_eq!(report.copied, vec![config.destination.join("kv_system.h")]);
        assert_eq!(
            fs::read_to_string(config.destination.join("kv_system.h"))?,
            "#define X 1\n"
        );
        Ok(())
    }

    #[test]
    fn test_mirror_skips_excluded_and_replaces_old_mirror() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = config_in(temp_dir.path());
        fs::create_dir_all(config.source.join("file"))?;
        fs::write(config.source.join("skiplist.c"), "")?;
        fs::write(config.source.join("test_skiplist.c"), "")?;
        fs::write(config.source.join("CuTest.h"), "")?;
        fs::write(&config.ignore_file, "; tests stay out\ntest_\nCuTest\n")?;

        fs::create_dir_all(&config.destination)?;
        fs::write(config.destination.join("stale.c"), "")?;

        let report = mirror(&config)?;

        assert!(report.cleaned);
        assert_eq!(report.rules, vec!["test_", "CuTest"]);
        assert_eq!(report.skipped, vec!["CuTest.h", "test_skiplist.c"]);
        assert_eq!(report.copied, vec![config.destination.join("skiplist.c")]);
        assert!(!config.destination.join("stale.c").exists());
        assert!(!config.destination.join("file").exists());
        Ok(())
    }
}
