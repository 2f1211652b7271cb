//! Command-line interface definition for Lattice.
//!
//! # Command Structure
//!
//! - `lattice check` - validate the dependency graph against the policy
//! - `lattice arch` - print the group-level architecture graph
//! - `lattice path` - shortest dependency path between two modules

mod commands;
pub mod enums;
mod tests;

use clap::Parser;

pub use commands::{ArchArgs, CheckArgs, Command, InputArgs, PathArgs};
pub use enums::*;

/// Lattice - architecture policy checks for module dependency graphs
#[derive(Parser, Debug)]
#[command(
    name = "lattice",
    version,
    about = "Validate module dependencies against an architecture policy",
    long_about = "Lattice resolves project and library references into a dependency graph,\n\
                  assigns modules to policy groups and checks every dependency against\n\
                  the allow/deny rules of a lattice.toml policy."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
