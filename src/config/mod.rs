//! Configuration management for iontools
//!
//! Settings are layered with figment (embedded defaults, user file, repository
//! file, custom file, environment) and extracted into the typed [`Settings`]
//! structure below.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::tabs::{ConvertOptions, Mode};

mod core;

pub use self::core::IonToolsConfig;

/// Fully merged iontools settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub tabs: TabsConfig,
    pub tests: TestsConfig,
    pub format: FormatConfig,
    pub mirror: MirrorConfig,
    pub flatten: FlattenConfig,
    pub hooks: HooksConfig,
}

/// Space-to-tab conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabsConfig {
    /// Number of spaces collapsed into one tab
    pub width: usize,

    /// Which runs are eligible for conversion
    #[serde(default)]
    pub mode: Mode,
}

impl TabsConfig {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            tab_width: self.width,
            mode: self.mode,
        }
    }
}

/// Test runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestsConfig {
    /// Directory holding the compiled test executables
    pub directory: PathBuf,
}

/// External source formatter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Formatter executable (looked up on PATH)
    pub command: String,

    /// Style file passed with `-c`
    pub style_config: PathBuf,

    /// File name globs selecting the sources to format
    pub patterns: Vec<String>,
}

/// Top-level source mirror for the Arduino build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub source: PathBuf,
    pub destination: PathBuf,

    /// File of exclusion regexes, one per line
    pub ignore_file: PathBuf,
}

/// Recursive source flattener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenConfig {
    pub source: PathBuf,
    pub destination: PathBuf,

    /// Rewrite `#include "dir/file.h"` to `#include "file.h"`
    #[serde(default = "default_fix_includes")]
    pub fix_includes: bool,

    /// Regexes; a file whose path matches any of them is not flattened
    #[serde(default)]
    pub filters: Vec<String>,

    /// Extra content rewrites applied after the include fix
    #[serde(default)]
    pub replacements: Vec<ReplacementRule>,
}

fn default_fix_includes() -> bool {
    true
}

/// A regex substitution applied to file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementRule {
    pub pattern: String,
    pub replacement: String,
}

/// Git hook installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Directory (relative to the work tree) holding the hook sources
    pub source: PathBuf,

    #[serde(default)]
    pub files: Vec<HookFile>,
}

/// One file installed into `.git/hooks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookFile {
    /// File name, identical in the source directory and the hooks directory
    pub file: String,

    /// Copy verbatim instead of templating
    #[serde(default)]
    pub copy: bool,

    /// Mark the installed file executable
    #[serde(default)]
    pub exec: bool,

    /// Placeholder to hooks-relative path substitutions for templated files
    #[serde(default)]
    pub replacements: BTreeMap<String, String>,
}

impl Settings {
    /// Reject settings that would make a tool misbehave
    pub fn validate(&self) -> Result<()> {
        if self.tabs.width == 0 {
            anyhow::bail!("tabs.width must be at least 1");
        }

        if self.format.command.trim().is_empty() {
            anyhow::bail!("format.command cannot be empty");
        }
        if self.format.patterns.is_empty() {
            anyhow::bail!("format.patterns must name at least one file pattern");
        }

        if self.mirror.source == self.mirror.destination {
            anyhow::bail!("mirror.source and mirror.destination must differ");
        }
        if self.flatten.source == self.flatten.destination {
            anyhow::bail!("flatten.source and flatten.destination must differ");
        }

        for filter in &self.flatten.filters {
            Regex::new(filter).with_context(|| format!("Invalid flatten filter: {filter}"))?;
        }
        for rule in &self.flatten.replacements {
            Regex::new(&rule.pattern)
                .with_context(|| format!("Invalid flatten replacement pattern: {}", rule.pattern))?;
        }

        if let Some(hook) = self.hooks.files.iter().find(|h| h.file.trim().is_empty()) {
            anyhow::bail!("hooks.files entry has an empty file name: {hook:?}");
        }

        Ok(())
    }
}
