//! Locating the policy file for CLI use.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::compile::PolicyFile;
use crate::error::{ConfigError, Result};

/// Default policy file name.
pub const POLICY_FILE_NAME: &str = "lattice.toml";

/// Searches for `lattice.toml` in a directory and its ancestors.
///
/// # Example
///
/// ```no_run
/// use lattice_config::ConfigDiscovery;
///
/// let policy = ConfigDiscovery::new(".").load()?;
/// # Ok::<(), lattice_config::ConfigError>(())
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The nearest `lattice.toml`, starting at the root directory.
    pub fn find(&self) -> Option<PathBuf> {
        self.root
            .ancestors()
            .map(|dir| dir.join(POLICY_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no policy file exists in the root
    /// or any of its ancestors.
    pub fn load(&self) -> Result<PolicyFile> {
        let path = self
            .find()
            .ok_or_else(|| ConfigError::NotFound(self.root.join(POLICY_FILE_NAME)))?;
        debug!(path = %path.display(), "discovered policy file");
        PolicyFile::load(path)
    }
}
