use clap::Parser;
use foldertidy::cli::{Cli, run_cli};
use foldertidy::logging::init_file_logging;
use foldertidy::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command();
    let options = cli.into_options();

    if !options.target.is_dir() {
        OutputFormatter::error(&format!(
            "Target folder '{}' does not exist.",
            options.target.display()
        ));
        return ExitCode::FAILURE;
    }

    if let Err(e) = init_file_logging(&options.target) {
        OutputFormatter::warning(&e);
    }

    match run_cli(command, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
