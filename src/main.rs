use clap::Parser;
use std::process::ExitCode;

use iontools::{Cli, Output};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // One line per failure, causes joined with ": "
            Output::new(false, false).error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
