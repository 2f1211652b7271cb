//! Error types for policy loading and settings extraction.

use std::path::{Path, PathBuf};

use lattice_graph::{GraphError, Location};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid policy file {}: {message}", position(.path, .line))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error("invalid config value for `{field}` at {location}{}", suffix(.hint))]
    InvalidValue {
        field: String,
        location: Location,
        hint: Option<String>,
    },

    #[error("invalid pattern at {location}")]
    InvalidPattern {
        location: Location,
        #[source]
        source: GraphError,
    },

    #[error("invalid settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Line inside the policy file the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => *line,
            Self::InvalidValue { location, .. } | Self::InvalidPattern { location, .. } => {
                Some(location.line)
            }
            _ => None,
        }
    }
}

fn position(path: &Path, line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("{}:{line}", path.display()),
        None => path.display().to_string(),
    }
}

fn suffix(hint: &Option<String>) -> String {
    hint.as_deref().map(|hint| format!(" ({hint})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_carries_line() {
        let err = ConfigError::Parse {
            path: "lattice.toml".into(),
            line: Some(4),
            message: "expected `=`".to_string(),
        };
        assert_eq!(err.to_string(), "invalid policy file lattice.toml:4: expected `=`");
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_invalid_value_hint() {
        let err = ConfigError::InvalidValue {
            field: "group.name".to_string(),
            location: Location::new("lattice.toml", 7),
            hint: Some("use \"-\" for no group".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for `group.name` at lattice.toml:7 (use \"-\" for no group)"
        );
    }
}
