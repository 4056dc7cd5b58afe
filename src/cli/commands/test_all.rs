use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::Settings;
use crate::runner;

#[derive(Args)]
pub struct TestAllArgs {
    /// Directory holding the test executables (defaults to tests.directory)
    #[arg(value_name = "DIR")]
    pub tests_dir: Option<PathBuf>,
}

pub async fn execute(args: TestAllArgs, settings: &Settings, output: &Output) -> Result<()> {
    let directory = args
        .tests_dir
        .unwrap_or_else(|| settings.tests.directory.clone());

    output.header(&format!("Running tests in {}", directory.display()));
    let summary = runner::run_all(&directory).await?;

    if summary.outcomes.is_empty() {
        output.warning("No executable files found");
        return Ok(());
    }

    for outcome in &summary.outcomes {
        let status = match outcome.code {
            Some(0) => "passed".to_string(),
            Some(code) => format!("exited with code {code}"),
            None if outcome.stderr.is_empty() => "terminated by signal".to_string(),
            None => outcome.stderr.trim().to_string(),
        };
        output.action_result(&outcome.name, &status, outcome.success);
        output.block(&outcome.stdout);
        if !outcome.success {
            output.verbose(outcome.stderr.trim());
        }
    }

    output.summary_stats("Passed:", summary.passed());
    output.summary_stats("Failed:", summary.failed());

    if summary.failed() > 0 {
        anyhow::bail!(
            "{} of {} test executables failed",
            summary.failed(),
            summary.outcomes.len()
        );
    }

    output.success("All test executables passed");
    Ok(())
}
