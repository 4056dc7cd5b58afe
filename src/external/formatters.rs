//! Source formatter wrapper
//!
//! Finds C/C++ sources and rewrites them in place with the configured
//! formatter (uncrustify by default).

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::FormatConfig;

/// Result of formatting one file
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    pub path: PathBuf,
    pub success: bool,
    pub message: String,
}

/// Build a matcher for file-name globs such as `*.c`
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid file pattern: {pattern}"))?;
        builder.add(glob);
    }

    Ok(builder.build()?)
}

/// Recursively collect files under `root` whose name matches `patterns`, sorted
pub fn find_sources(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let matcher = build_globset(patterns)?;

    // Walk everything, like a plain `find`: hidden and git-ignored files included
    let walker = WalkBuilder::new(root).standard_filters(false).build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if entry.file_name().to_str().is_some_and(|name| matcher.is_match(name)) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    Ok(files)
}

/// Locate the formatter binary on PATH
pub fn locate_formatter(command: &str) -> Result<PathBuf> {
    which::which(command).with_context(|| {
        format!("Formatter '{command}' not found on PATH; install it or set format.command")
    })
}

/// Format every file in place, in parallel; outcomes come back in input order
pub fn format_files(formatter: &Path, config: &FormatConfig, files: &[PathBuf]) -> Vec<FormatOutcome> {
    files
        .par_iter()
        .map(|file| format_file(formatter, &config.style_config, file))
        .collect()
}

fn format_file(formatter: &Path, style_config: &Path, file: &Path) -> FormatOutcome {
    tracing::debug!("Formatting {}", file.display());

    let result = Command::new(formatter)
        .arg("-c")
        .arg(style_config)
        .arg("--replace")
        .arg("--no-backup")
        .arg(file)
        .output();

    match result {
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            FormatOutcome {
                path: file.to_path_buf(),
                success: output.status.success(),
                message: if output.status.success() {
                    "formatted".to_string()
                } else if stderr.is_empty() {
                    format!("formatter exited with {}", output.status)
                } else {
                    stderr
                },
            }
        }
        Err(e) => FormatOutcome {
            path: file.to_path_buf(),
            success: false,
            message: format!("failed to start formatter: {e}"),
        },
    }
}
