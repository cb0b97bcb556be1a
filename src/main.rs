use clap::Parser;
use std::process::ExitCode;
use tidyfolder::cli::{Cli, run_cli};
use tidyfolder::output::OutputFormatter;
use tracing::Level;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::ERROR })
        .init();

    match run_cli(cli.operation(), &cli.folder, &cli.options()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
