use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::FlattenConfig;

lazy_static! {
    static ref C_INCLUDE: Regex =
        Regex::new(r#"#include\s*"(?:.*/|)(.*\.h)\s*""#).expect("include regex is valid");
}

/// Strip directories from quoted includes: `#include "a/b.h"` becomes `#include "b.h"`
pub fn fix_c_includes(contents: &str) -> String {
    C_INCLUDE.replace_all(contents, r#"#include "${1}""#).into_owned()
}

#[derive(Debug, Clone, Default)]
pub struct FlattenReport {
    pub written: Vec<PathBuf>,
    pub filtered: Vec<PathBuf>,
}

/// Copies a source tree into a single directory
pub struct Flattener {
    source: PathBuf,
    destination: PathBuf,
    filters: Vec<Regex>,
    replacements: Vec<(Regex, String)>,
    fix_includes: bool,
}

impl Flattener {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            filters: Vec::new(),
            replacements: Vec::new(),
            fix_includes: false,
        }
    }

    pub fn from_config(config: &FlattenConfig) -> Result<Self> {
        let mut flattener = Self::new(&config.source, &config.destination);
        flattener.fix_includes = config.fix_includes;
        for filter in &config.filters {
            flattener.add_filter(filter)?;
        }
        for rule in &config.replacements {
            flattener.add_replacement(&rule.pattern, &rule.replacement)?;
        }

        Ok(flattener)
    }

    pub fn add_filter(&mut self, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern).with_context(|| format!("Invalid filter: {pattern}"))?;
        self.filters.push(regex);
        Ok(())
    }

    pub fn add_replacement(&mut self, pattern: &str, replacement: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("Invalid replacement pattern: {pattern}"))?;
        self.replacements.push((regex, replacement.to_string()));
        Ok(())
    }

    pub fn is_filtered(&self, path: &str) -> bool {
        self.filters.iter().any(|filter| filter.is_match(path))
    }

    /// Apply the include fix, then every replacement rule in order
    pub fn rewrite(&self, contents: &str) -> String {
        let mut out = if self.fix_includes {
            fix_c_includes(contents)
        } else {
            contents.to_string()
        };
        for (pattern, replacement) in &self.replacements {
            out = pattern.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }

    /// Files under the source that survive the filters, relative to the source
    pub fn file_list(&self) -> Result<Vec<PathBuf>> {
        Ok(self.partition()?.0)
    }

    /// Split the source files into (kept, filtered), both relative to the source
    fn partition(&self) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut kept = Vec::new();
        let mut filtered = Vec::new();

        for entry in WalkDir::new(&self.source).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", self.source.display()))?;
            // `path().is_dir()` follows links, so linked directories are skipped too
            if entry.path().is_dir() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.source)
                .unwrap_or(entry.path())
                .to_path_buf();
            let canonical = entry.path().canonicalize()?;

            if self.is_filtered(&relative.to_string_lossy())
                || self.is_filtered(&canonical.to_string_lossy())
            {
                filtered.push(relative);
            } else {
                kept.push(relative);
            }
        }

        Ok((kept, filtered))
    }

    pub fn flatten(&self) -> Result<FlattenReport> {
        fs::create_dir_all(&self.destination)
            .with_context(|| format!("Failed to create {}", self.destination.display()))?;

        let (kept, filtered) = self.partition()?;
        let mut report = FlattenReport {
            filtered,
            ..Default::default()
        };

        for relative in &kept {
            let source_path = self.source.join(relative);
            let contents = fs::read_to_string(&source_path)
                .with_context(|| format!("Failed to read {}", source_path.display()))?;

            let Some(name) = relative.file_name() else {
                continue;
            };
            let target = self.destination.join(name);
            if report.written.contains(&target) {
                tracing::warn!("{} overwrites an earlier file of the same name", relative.display());
            }
            fs::write(&target, self.rewrite(&contents))
                .with_context(|| format!("Failed to write {}", target.display()))?;
            report.written.push(target);
        }

        Ok(report)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplacementRule;
    use tempfile::TempDir;

    #[test]
    fn test_fix_c_includes() {
        assert_eq!(fix_c_includes(r#"#include "this/is/a/test.h""#), r#"#include "test.h""#);
        assert_eq!(fix_c_includes(r#"#include "kv_system.h""#), r#"#include "kv_system.h""#);
        assert_eq!(fix_c_includes(r#"#include"../file/ion_file.h" "#), r#"#include "ion_file.h" "#);
        assert_eq!(fix_c_includes("#include <stdio.h>"), "#include <stdio.h>");
        assert_eq!(
            fix_c_includes("#include \"a/b.h\"\nint x;\n#include \"c/d/e.h\"\n"),
            "#include \"b.h\"\nint x;\n#include \"e.h\"\n"
        );
    }

    #[test]
    fn test_filters_search_anywhere_in_path() {
        let mut flattener = Flattener::new("src", "out");
        flattener.add_filter(r"test_\w+\.c").unwrap();
        assert!(flattener.is_filtered("tests/test_skiplist.c"));
        assert!(!flattener.is_filtered("skiplist.c"));
    }

    #[test]
    fn test_flatten_tree() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("bin/flatten");
        fs::create_dir_all(source.join("file"))?;
        fs::create_dir_all(source.join("tests"))?;

        fs::write(source.join("file/ion_file.h"), "#define ION_FILE\n")?;
        fs::write(
            source.join("file/ion_file.c"),
            "#include \"../kv_system.h\"\n#include \"ion_file.h\"\nint FLAG;\n",
        )?;
        fs::write(source.join("kv_system.h"), "int FLAG;\n")?;
        fs::write(source.join("tests/test_file.c"), "")?;

        let config = FlattenConfig {
            source: source.clone(),
            destination: destination.clone(),
            fix_includes: true,
            filters: vec![r"test_\w+\.c".to_string()],
            replacements: vec![ReplacementRule {
                pattern: r"\bFLAG\b".to_string(),
                replacement: "ION_FLAG".to_string(),
            }],
        };
        let flattener = Flattener::from_config(&config)?;
        let report = flattener.flatten()?;

        assert_eq!(report.written.len(), 3);
        assert_eq!(report.filtered, vec![PathBuf::from("tests").join("test_file.c")]);
        assert_eq!(
            fs::read_to_string(destination.join("ion_file.c"))?,
            "#include \"kv_system.h\"\n#include \"ion_file.h\"\nint ION_FLAG;\n"
        );
        assert_eq!(fs::read_to_string(destination.join("kv_system.h"))?, "int ION_FLAG;\n");
        assert!(destination.join("ion_file.h").is_file());
        assert!(!destination.join("test_file.c").exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_directory_is_skipped() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let source = temp_dir.path().join("src");
        let elsewhere = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&source)?;
        fs::create_dir_all(&elsewhere)?;
        fs::write(source.join("kv_system.h"), "int x;\n")?;
        std::os::unix::fs::symlink(&elsewhere, source.join("linked"))?;

        let flattener = Flattener::new(&source, temp_dir.path().join("out"));
        assert_eq!(flattener.file_list()?, vec![PathBuf::from("kv_system.h")]);

        let report = flattener.flatten()?;
        assert_eq!(report.written.len(), 1);
        Ok(())
    }
}
