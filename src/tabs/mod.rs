//! Space-to-tab conversion for C sources
//!
//! Runs of a fixed number of spaces are collapsed into a single tab. The
//! literal-aware mode leaves spaces inside double-quoted string literals
//! untouched so that string contents never change.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

mod convert;
mod spans;

pub use convert::{convert, qualifying_runs};
pub use spans::{Span, space_runs, string_literal_spans};

/// Text converted when no input file is given
pub const SAMPLE_TEXT: &str = r#"a         "    heeeeeeyyyyeah    ""#;

/// Default number of spaces collapsed into one tab
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Which space runs are eligible for substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Replace every run, string literals included
    All,
    /// Skip runs fully inside a double-quoted string literal
    #[default]
    LiteralAware,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub tab_width: usize,
    pub mode: Mode,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            mode: Mode::default(),
        }
    }
}

/// Failures at the I/O boundary of the `tabs` command
#[derive(Error, Debug)]
pub enum TabsError {
    #[error("Could not read file: {}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write to file: {}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
