use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::Settings;
use crate::mirror;

#[derive(Args)]
pub struct MirrorArgs {
    /// Override mirror.source
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Override mirror.destination
    #[arg(long)]
    pub destination: Option<PathBuf>,
}

pub async fn execute(args: MirrorArgs, settings: &Settings, output: &Output) -> Result<()> {
    let mut config = settings.mirror.clone();
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(destination) = args.destination {
        config.destination = destination;
    }
    if config.source == config.destination {
        anyhow::bail!("Mirror source and destination must differ");
    }

    let report = mirror::mirror(&config)?;

    if report.created_ignore_file {
        output.info(&format!("Created {}", config.ignore_file.display()));
    }
    output.info(&format!("Ignoring the following rules: {}", report.rules.join(", ")));
    if report.cleaned {
        output.step("Cleaned old mirror");
    }
    for name in &report.skipped {
        output.step(&format!("Skipping {name}"));
    }
    for copied in &report.copied {
        output.verbose(&format!("Copied {}", copied.display()));
    }

    output.success(&format!(
        "Mirrored {} files into {}",
        report.copied.len(),
        config.destination.display()
    ));
    Ok(())
}
