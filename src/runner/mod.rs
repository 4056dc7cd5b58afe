//! Test executable runner
//!
//! Runs every executable file found directly inside a directory and collects
//! what each one printed. The C test suites report their own results on
//! stdout; the runner only tracks whether each process exited cleanly.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Result of running a single test executable
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub name: String,
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal or never started
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<TestOutcome>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }
}

/// Executable regular files directly inside `dir`, sorted by name
pub fn find_executables(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read test directory: {}", dir.display()))?;

    let mut executables = Vec::new();
    for entry in entries {
        let path = entry?.path();
        // Follows links, so a linked test binary counts as a file
        let Ok(metadata) = fs::metadata(&path) else {
            continue;
        };
        if metadata.is_file() && is_executable(&path, &metadata) {
            executables.push(path);
        }
    }
    executables.sort();

    Ok(executables)
}

#[cfg(unix)]
fn is_executable(_path: &Path, metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(path: &Path, _metadata: &fs::Metadata) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

/// Run every executable in `dir`, one after another, with `dir` as working directory
pub async fn run_all(dir: &Path) -> Result<RunSummary> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Test directory not found: {}", dir.display()))?;

    let mut summary = RunSummary::default();
    for executable in find_executables(&dir)? {
        summary.outcomes.push(run_one(&executable, &dir).await);
    }

    Ok(summary)
}

/// Run a single executable; a spawn failure is reported as a failed outcome
pub async fn run_one(executable: &Path, working_dir: &Path) -> TestOutcome {
    let name = executable
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| executable.display().to_string());

    tracing::debug!("Running test executable {}", executable.display());

    match Command::new(executable).current_dir(working_dir).output().await {
        Ok(output) => TestOutcome {
            name,
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => {
            tracing::warn!("Failed to start {}: {}", executable.display(), e);
            TestOutcome {
                name,
                success: false,
                code: None,
                stdout: String::new(),
                stderr: e.to_string(),
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str, mode: u32) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[test]
    fn test_find_executables_skips_plain_files() {
        let temp_dir = TempDir::new().unwrap();
        write_script(temp_dir.path(), "b_test", "true", 0o755);
        write_script(temp_dir.path(), "a_test", "true", 0o700);
        write_script(temp_dir.path(), "notes.txt", "true", 0o644);
        fs::create_dir(temp_dir.path().join("subdir")).unwrap();

        let found = find_executables(temp_dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_test", "b_test"]);
    }

    #[tokio::test]
    async fn test_run_all_collects_output_and_status() {
        let temp_dir = TempDir::new().unwrap();
        write_script(temp_dir.path(), "passes", "echo ok from $(basename \"$PWD\")", 0o755);
        write_script(temp_dir.path(), "fails", "echo broken >&2\nexit 3", 0o755);

        let summary = run_all(temp_dir.path()).await.unwrap();
        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 1);

        let fails = &summary.outcomes[0];
        assert_eq!(fails.name, "fails");
        assert_eq!(fails.code, Some(3));
        assert!(fails.stderr.contains("broken"));

        let passes = &summary.outcomes[1];
        let dir_name = temp_dir.path().file_name().unwrap().to_str().unwrap();
        assert!(passes.success);
        assert_eq!(passes.stdout.trim(), format!("ok from {dir_name}"));
    }

    #[test]
    fn test_find_executables_follows_links() {
        let temp_dir = TempDir::new().unwrap();
        let build = temp_dir.path().join("build");
        let tests = temp_dir.path().join("tests");
        fs::create_dir(&build).unwrap();
        fs::create_dir(&tests).unwrap();
        write_script(&build, "skiplist_test", "true", 0o755);
        std::os::unix::fs::symlink(build.join("skiplist_test"), tests.join("skiplist_test")).unwrap();
        std::os::unix::fs::symlink(build.join("gone"), tests.join("dangling")).unwrap();

        let found = find_executables(&tests).unwrap();
        assert_eq!(found, vec![tests.join("skiplist_test")]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        assert!(run_all(Path::new("/definitely/not/a/dir")).await.is_err());
    }
}
