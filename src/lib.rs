//! # iontools - developer tooling for the IonDB repository
//!
//! One binary bundling the chores of working on the IonDB C sources:
//!
//! - **tabs**: collapse runs of spaces into tabs without touching string literals
//! - **test-all**: run every compiled test executable in a directory
//! - **format**: run uncrustify over all C/C++ sources
//! - **mirror** / **flatten**: stage sources for the Arduino build
//! - **setup-hooks**: install the repository git hooks
//!
//! ## Library Usage
//!
//! ```rust
//! use iontools::tabs::{ConvertOptions, Mode, convert};
//!
//! let options = ConvertOptions { tab_width: 4, mode: Mode::LiteralAware };
//! assert_eq!(convert("a    \"    b\"", &options), "a\t\"    b\"");
//! ```

pub mod cli;
pub mod config;
pub mod external;
pub mod git;
pub mod hooks;
pub mod mirror;
pub mod runner;
pub mod tabs;

pub use cli::{Cli, Output};
pub use config::{IonToolsConfig, Settings};
