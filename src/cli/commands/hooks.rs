//! Git hooks installation command

use anyhow::Result;
use clap::Args;

use crate::cli::Output;
use crate::config::Settings;
use crate::git::GitOperations;
use crate::hooks;

#[derive(Args)]
pub struct SetupHooksArgs {}

pub async fn execute(_args: SetupHooksArgs, settings: &Settings, output: &Output) -> Result<()> {
    let git = GitOperations::discover()?;
    output.header("Installing Git Hooks");
    output.verbose(&format!("Hooks directory: {}", git.hooks_dir().display()));

    let installed = hooks::install(&git, &settings.hooks)?;
    for hook in &installed {
        let how = match (hook.templated, hook.executable) {
            (true, true) => "templated, executable",
            (true, false) => "templated",
            (false, true) => "copied, executable",
            (false, false) => "copied",
        };
        output.action_result(&hook.name, how, true);
    }

    output.success(&format!("Installed {} hook files", installed.len()));
    Ok(())
}
