use clap::Parser;
use extsort::cli::{Cli, run_cli};
use extsort::logging;
use extsort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.log_file.as_deref()) {
        logging::init_logging_stderr();
        OutputFormatter::warning(&format!("Could not open log file: {}", e));
    }

    match run_cli(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
