//! Lattice CLI - architecture policy checks for module dependency graphs.
//!
//! Parses arguments, sets up logging and dispatches to a command. The process
//! exit code is whatever the command reports, or 255 for fatal errors.

use std::process::ExitCode;

use clap::Parser;
use lattice_cli::{cli, commands, error, logger, ui};

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    match commands::run(args.command) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{:?}", error::cli_error_to_miette(err));
            ExitCode::from(error::EXIT_FATAL)
        }
    }
}
