use std::path::PathBuf;

use thiserror::Error;

use crate::ModuleId;

/// Fatal errors. Anything that is not one of these is reported as a
/// [`Diagnostic`](crate::Diagnostic) instead.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two distinct declarations describe the same module.
    #[error("conflicting declarations for {}: {}", names.join(", "), display_paths(paths))]
    IdentityConflict { names: Vec<String>, paths: Vec<PathBuf> },

    /// An edge points at a module id outside the graph.
    #[error("dependency refers to unknown module {0}")]
    UnknownModule(ModuleId),

    /// A name or path pattern failed to compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no paths declared".to_string();
    }
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_conflict_lists_every_path() {
        let error = GraphError::IdentityConflict {
            names: vec!["App".to_string(), "Other".to_string()],
            paths: vec![PathBuf::from("/a/App.csproj"), PathBuf::from("/b/Other.csproj")],
        };
        assert_eq!(
            error.to_string(),
            "conflicting declarations for App, Other: /a/App.csproj, /b/Other.csproj"
        );
    }
}
