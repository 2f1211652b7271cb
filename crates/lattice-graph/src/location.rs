use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A position inside an input or policy file, used to point diagnostics back
/// at whatever declared them.
///
/// The default location (empty file, line 0) marks synthesized edges that
/// have no textual origin, such as the probes used by the architecture
/// deriver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn is_synthetic(&self) -> bool {
        self.file.as_os_str().is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            return f.write_str("<synthetic>");
        }
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Location::new("lattice.toml", 12).to_string(), "lattice.toml:12");
        assert_eq!(Location::default().to_string(), "<synthetic>");
    }

    #[test]
    fn test_ordering_by_file_then_line() {
        let a = Location::new("a.toml", 9);
        let b = Location::new("a.toml", 10);
        let c = Location::new("b.toml", 1);
        assert!(a < b && b < c);
    }
}
