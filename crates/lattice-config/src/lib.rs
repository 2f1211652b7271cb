//! # lattice-config
//!
//! Loads `lattice.toml` policy files into [`lattice_rules::Policy`] values and
//! resolves the report [`Settings`] the CLI runs with.
//!
//! ```toml
//! inputs = ["src"]
//!
//! [[group]]
//! name = "Core"
//! matches = "Company.Core*"
//!
//! [[rule]]
//! type = "deny"
//! source = { group = "Core" }
//! target = { group = "UI" }
//! ```
//!
//! Every group, ignore and rule entry remembers the line it starts on, so
//! diagnostics and unused-entry reports can point back at it.

pub mod compile;
pub mod discovery;
pub mod document;
pub mod error;
pub mod settings;

pub use compile::{OutputSpec, PolicyFile};
pub use discovery::{ConfigDiscovery, POLICY_FILE_NAME};
pub use error::{ConfigError, Result};
pub use settings::{ENV_PREFIX, ReportFormat, Settings, SettingsOverrides};
