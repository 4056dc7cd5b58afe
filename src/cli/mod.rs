//! Command-line interface for iontools
//!
//! Argument parsing uses clap derive; each subcommand lives in its own
//! module under [`commands`].

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::Output;
