//! Command implementations.
//!
//! - [`check`] - validate and report, exit code from error violations
//! - [`arch`] - group-level architecture graph
//! - [`path`] - shortest dependency path between two modules
//!
//! Every command returns the process exit code on success.

pub mod arch;
pub mod check;
pub mod path;

use std::path::Path;

use lattice_config::{ConfigDiscovery, PolicyFile};
use lattice_rules::Analysis;
use tracing::debug;

use crate::cli::{Command, InputArgs};
use crate::error::Result;
use crate::loader;

pub use arch::execute as arch_execute;
pub use check::execute as check_execute;
pub use path::execute as path_execute;

/// Dispatch a parsed subcommand.
pub fn run(command: Command) -> Result<u8> {
    match command {
        Command::Check(args) => check_execute(args),
        Command::Arch(args) => arch_execute(args),
        Command::Path(args) => path_execute(args),
    }
}

/// The policy file and the analysis built from the input manifests.
pub(crate) struct Session {
    pub policy: PolicyFile,
    pub analysis: Analysis,
}

impl Session {
    pub(crate) fn load(input: &InputArgs) -> Result<Self> {
        let policy = load_policy(input.config.as_deref())?;
        let builder = loader::load_manifests(&input.inputs)?;
        debug!(declared = builder.declared_count(), "manifests loaded");
        let analysis = policy.policy.analyze(builder)?;
        Ok(Self { policy, analysis })
    }
}

fn load_policy(config: Option<&Path>) -> Result<PolicyFile> {
    let policy = match config {
        Some(path) => PolicyFile::load(path)?,
        None => ConfigDiscovery::new(std::env::current_dir()?).load()?,
    };
    Ok(policy)
}
