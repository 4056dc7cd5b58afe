use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::Settings;
use crate::mirror::Flattener;

#[derive(Args)]
pub struct FlattenArgs {
    /// Override flatten.source
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Override flatten.destination
    #[arg(long)]
    pub destination: Option<PathBuf>,

    /// Only list the files that would be flattened
    #[arg(long)]
    pub list: bool,
}

pub async fn execute(args: FlattenArgs, settings: &Settings, output: &Output) -> Result<()> {
    let mut config = settings.flatten.clone();
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(destination) = args.destination {
        config.destination = destination;
    }

    let flattener = Flattener::from_config(&config)?;

    if args.list {
        for file in flattener.file_list()? {
            output.list_item(&file.display().to_string());
        }
        return Ok(());
    }

    let report = flattener.flatten()?;
    for filtered in &report.filtered {
        output.verbose(&format!("Filtered {}", filtered.display()));
    }

    output.success(&format!(
        "Flattened {} files from {} into {} ({} filtered)",
        report.written.len(),
        flattener.source().display(),
        flattener.destination().display(),
        report.filtered.len()
    ));
    Ok(())
}
