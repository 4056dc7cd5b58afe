use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::cli::Output;
use crate::config::{IonToolsConfig, Settings};

pub mod config;
pub mod flatten;
pub mod format;
pub mod hooks;
pub mod mirror;
pub mod tabs;
pub mod test_all;

#[derive(Parser)]
#[command(
    name = "iontools",
    version = env!("CARGO_PKG_VERSION"),
    about = "Developer tooling for the IonDB repository",
    long_about = "iontools bundles the IonDB repository chores: space-to-tab conversion, \
                  running compiled tests, source formatting, staging sources for the \
                  Arduino build and installing git hooks."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collapse runs of spaces into tabs, leaving string literals alone
    Tabs(tabs::TabsArgs),
    /// Run every executable in a directory
    TestAll(test_all::TestAllArgs),
    /// Format C/C++ sources in place with the configured formatter
    Format(format::FormatArgs),
    /// Mirror top-level sources into the deployment folder
    Mirror(mirror::MirrorArgs),
    /// Flatten the source tree into a single directory
    Flatten(flatten::FlattenArgs),
    /// Install the repository git hooks into .git/hooks
    SetupHooks(hooks::SetupHooksArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Change directory if specified
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        let Some(command) = self.command else {
            Cli::command().print_help()?;
            return Ok(());
        };

        // Config commands report load and validation problems themselves
        if let Commands::Config(args) = command {
            return config::execute(args, self.config.as_deref(), &output).await;
        }

        let settings = load_settings(self.config.as_deref())?;

        match command {
            Commands::Tabs(args) => tabs::execute(args, &settings, &output).await,
            Commands::TestAll(args) => test_all::execute(args, &settings, &output).await,
            Commands::Format(args) => format::execute(args, &settings, &output).await,
            Commands::Mirror(args) => mirror::execute(args, &settings, &output).await,
            Commands::Flatten(args) => flatten::execute(args, &settings, &output).await,
            Commands::SetupHooks(args) => hooks::execute(args, &settings, &output).await,
            Commands::Config(_) => unreachable!("handled above"),
        }
    }
}

fn load_settings(custom_config: Option<&str>) -> Result<Settings> {
    let settings = IonToolsConfig::load(custom_config)?.settings()?;
    settings.validate()?;
    tracing::debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stderr keeps stdout free for `tabs` output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
