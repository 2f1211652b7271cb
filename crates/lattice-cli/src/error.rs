//! Fatal errors of the Lattice CLI.
//!
//! Policy violations are not errors: they are diagnostics and only influence
//! the exit code. Everything here aborts the run with [`EXIT_FATAL`].

use std::path::PathBuf;

use thiserror::Error;

mod miette;

pub use self::miette::cli_error_to_miette;

/// Exit code for configuration, input and I/O failures.
pub const EXIT_FATAL: u8 = 255;

/// Highest exit code used to report error violations.
pub const EXIT_MAX_VIOLATIONS: u8 = 254;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] lattice_config::ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] lattice_graph::GraphError),

    /// An input manifest could not be parsed.
    #[error("Invalid input manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Exit code for a run with `errors` error-severity violations.
pub fn exit_code(errors: usize) -> u8 {
    u8::try_from(errors).map_or(EXIT_MAX_VIOLATIONS, |count| count.min(EXIT_MAX_VIOLATIONS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_caps_below_fatal() {
        assert_eq!(exit_code(0), 0);
        assert_eq!(exit_code(3), 3);
        assert_eq!(exit_code(254), 254);
        assert_eq!(exit_code(255), 254);
        assert_eq!(exit_code(10_000), 254);
    }

    #[test]
    fn test_file_not_found_message() {
        let err = CliError::FileNotFound(PathBuf::from("deps.json"));
        assert_eq!(err.to_string(), "File not found: deps.json");
    }
}
