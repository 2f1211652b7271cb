use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::enums::*;

/// Available Lattice subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate dependencies against the policy
    ///
    /// Builds the dependency graph from the input manifests, assigns groups
    /// and reports every rule violation. Exits with the number of
    /// error-severity violations (capped at 254).
    Check(CheckArgs),

    /// Print the group-level architecture graph
    ///
    /// Lists, for every ordered pair of groups, whether the error rules allow
    /// dependencies between them, say nothing, or contradict each other.
    Arch(ArchArgs),

    /// Show the shortest dependency path between two modules
    Path(PathArgs),
}

/// Where the graph and the policy come from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input manifest(s) describing projects and their references
    ///
    /// Examples:
    ///   lattice check -i deps.json
    ///   lattice check -i backend.json -i frontend.json
    #[arg(short, long = "input", value_name = "MANIFEST", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Policy file
    ///
    /// Defaults to the nearest lattice.toml in the current directory or one
    /// of its parents.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Report format (overrides the policy's [settings] and LATTICE_FORMAT)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<Format>,

    /// Also list dependencies that an allow rule matched
    #[arg(long)]
    pub show_allowed: bool,

    /// Skip the [[output]] files declared in the policy
    #[arg(long)]
    pub no_outputs: bool,
}

/// Arguments for the arch command
#[derive(Args, Debug, Clone)]
pub struct ArchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<Format>,
}

/// Arguments for the path command
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Module the path starts at (display or library name)
    pub from: String,

    /// Module the path ends at (display or library name)
    pub to: String,
}
