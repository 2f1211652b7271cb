//! Miette rendering for CLI errors.

use lattice_config::ConfigError;
use lattice_graph::GraphError;
use miette::Report;

use crate::error::CliError;

/// Convert a `CliError` into a report with an actionable hint where one exists.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Graph(GraphError::IdentityConflict { names, paths }) => miette::miette!(
            help = "Give each project a distinct library name, or remove the duplicate declaration",
            "Conflicting declarations for {}:\n  {}",
            names.join(", "),
            paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join("\n  ")
        ),
        CliError::Manifest { path, source } => miette::miette!(
            help = "Input manifests are JSON documents with a top-level \"projects\" array",
            "Invalid input manifest {}: {}",
            path.display(),
            source
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound(path) => miette::miette!(
            help = "Create a lattice.toml next to your sources or pass --config <path>",
            "Policy file not found: {}",
            path.display()
        ),
        ConfigError::InvalidPattern { location, source } => miette::miette!(
            help = "Name patterns use `*` and `|`; regex matchers use Rust regex syntax",
            "Invalid pattern at {}: {}",
            location,
            source
        ),
        _ => miette::miette!("Configuration error: {}", err),
    }
}
