use anyhow::Result;
use clap::Args;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::Settings;
use crate::tabs::{SAMPLE_TEXT, TabsError, convert};

#[derive(Args)]
pub struct TabsArgs {
    /// File to convert (a built-in sample is converted when omitted)
    pub input: Option<PathBuf>,

    /// File to write the result to (stdout when omitted)
    pub output: Option<PathBuf>,
}

pub async fn execute(args: TabsArgs, settings: &Settings, output: &Output) -> Result<()> {
    let options = settings.tabs.options();

    let text = match &args.input {
        Some(path) => fs::read_to_string(path).map_err(|source| TabsError::InputUnreadable {
            path: path.clone(),
            source,
        })?,
        None => {
            output.notice("No input file specified, using built-in sample");
            SAMPLE_TEXT.to_string()
        }
    };

    let converted = convert(&text, &options);
    tracing::info!(
        "Converted {} bytes into {} (tab width {}, {:?} mode)",
        text.len(),
        converted.len(),
        options.tab_width,
        options.mode
    );

    match &args.output {
        Some(path) => fs::write(path, &converted).map_err(|source| TabsError::OutputUnwritable {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(converted.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
