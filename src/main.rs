//! Command-line entry point for dotcon.
use std::process::ExitCode;

use clap::Parser;

use dotcon::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "link");
    let log = logging::Logger::new("link");
    if let Some(path) = log.log_path() {
        log.debug(&format!("log file: {}", path.display()));
    }

    match commands::link::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
