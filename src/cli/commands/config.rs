use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;

use crate::cli::Output;
use crate::config::IonToolsConfig;

const REPO_CONFIG_FILE: &str = "iontools.toml";

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write the default configuration to iontools.toml
    Init {
        /// Overwrite an existing iontools.toml
        #[arg(long)]
        force: bool,
    },
    /// Display current merged configuration
    Show {
        #[arg(short, long, value_enum, default_value_t = ShowFormat::Toml)]
        format: ShowFormat,
    },
    /// Validate the merged configuration
    Validate,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShowFormat {
    Json,
    Toml,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    match args.command {
        ConfigCommand::Init { force } => {
            if Path::new(REPO_CONFIG_FILE).exists() && !force {
                anyhow::bail!("{REPO_CONFIG_FILE} already exists (use --force to overwrite)");
            }
            std::fs::write(REPO_CONFIG_FILE, IonToolsConfig::default_toml())
                .with_context(|| format!("Failed to write {REPO_CONFIG_FILE}"))?;
            output.success(&format!("Created {REPO_CONFIG_FILE} with default settings"));
        }
        ConfigCommand::Show { format } => {
            let settings = IonToolsConfig::load(custom_config)?.settings()?;
            let rendered = match format {
                ShowFormat::Json => serde_json::to_string_pretty(&settings)?,
                ShowFormat::Toml => toml::to_string_pretty(&settings)?,
            };
            println!("{rendered}");
        }
        ConfigCommand::Validate => {
            let settings = IonToolsConfig::load(custom_config)?.settings()?;
            settings.validate()?;
            output.success("Configuration is valid");
        }
    }

    Ok(())
}
