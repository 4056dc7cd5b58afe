//! Git integration layer for iontools
//!
//! Thin wrapper over git2 used to locate the repository, its work tree and
//! its hooks directory.

use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

/// Git operations handler
pub struct GitOperations {
    repo: Repository,
}

impl GitOperations {
    /// Open a Git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open Git repository")?;

        Ok(Self { repo })
    }

    /// Discover and open a Git repository from current directory
    pub fn discover() -> Result<Self> {
        let repo = Repository::discover(".").context("No Git repository found")?;

        Ok(Self { repo })
    }

    /// Get working directory path
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory")
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.repo.path().join("hooks")
    }

    /// Write a file into the hooks directory, optionally marking it executable
    pub fn install_hook_file(&self, name: &str, content: &[u8], executable: bool) -> Result<PathBuf> {
        let hooks_dir = self.hooks_dir();
        let hook_path = hooks_dir.join(name);

        // Create hooks directory if it doesn't exist
        std::fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;

        std::fs::write(&hook_path, content)
            .with_context(|| format!("Failed to write hook file: {}", hook_path.display()))?;

        if executable {
            make_executable(&hook_path)?;
        }

        Ok(hook_path)
    }

    /// Check if a hook exists
    pub fn hook_exists(&self, name: &str) -> bool {
        self.hooks_dir().join(name).exists()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)
        .context("Failed to get hook file metadata")?
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).context("Failed to set hook file permissions")?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
