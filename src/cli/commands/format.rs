use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::Settings;
use crate::external::formatters;

#[derive(Args)]
pub struct FormatArgs {
    /// Directory to search for sources
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// List the files that would be formatted without running the formatter
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn execute(args: FormatArgs, settings: &Settings, output: &Output) -> Result<()> {
    let config = &settings.format;
    let files = formatters::find_sources(&args.root, &config.patterns)?;

    if files.is_empty() {
        output.warning(&format!(
            "No files matching {} under {}",
            config.patterns.join(", "),
            args.root.display()
        ));
        return Ok(());
    }

    if args.dry_run {
        output.header(&format!("{} files would be formatted", files.len()));
        for file in &files {
            output.list_item(&file.display().to_string());
        }
        return Ok(());
    }

    let formatter = formatters::locate_formatter(&config.command)?;
    output.step(&format!(
        "Formatting {} files with {}",
        files.len(),
        formatter.display()
    ));

    let outcomes = formatters::format_files(&formatter, config, &files);
    let failed = outcomes.iter().filter(|o| !o.success).count();
    for outcome in &outcomes {
        if outcome.success {
            output.verbose(&format!("{} {}", outcome.message, outcome.path.display()));
        } else {
            output.action_result(&outcome.path.display().to_string(), &outcome.message, false);
        }
    }

    if failed > 0 {
        anyhow::bail!("Formatter failed on {} of {} files", failed, outcomes.len());
    }

    output.success(&format!("Formatted {} files", outcomes.len()));
    Ok(())
}
