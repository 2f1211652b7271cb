//! Report settings layered from defaults, the policy file, the environment
//! and command-line flags, in that order.

use std::fmt;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Environment variables read by [`Settings::load`] carry this prefix.
pub const ENV_PREFIX: &str = "LATTICE_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Format of the report written to stdout.
    pub format: ReportFormat,
    /// Also list dependencies that an allow rule matched.
    pub show_allowed: bool,
}

/// The highest-priority layer, usually filled from CLI flags. `None` leaves
/// the lower layers in charge.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ReportFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_allowed: Option<bool>,
}

impl Settings {
    /// Merge defaults, the policy's `[settings]` table, `LATTICE_*` env vars
    /// and `overrides`.
    pub fn load(policy: &toml::Table, overrides: &SettingsOverrides) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Serialized::defaults(policy))
            .merge(Env::prefixed(ENV_PREFIX).only(&["format", "show_allowed"]))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|err| ConfigError::Settings(Box::new(err)))?;

        debug!(format = %settings.format, show_allowed = settings.show_allowed, "settings resolved");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    fn table(source: &str) -> toml::Table {
        toml::from_str(source).unwrap()
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let settings = Settings::load(&toml::Table::new(), &SettingsOverrides::default()).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.format, ReportFormat::Text);
            Ok(())
        });
    }

    #[test]
    fn test_policy_table_over_defaults() {
        Jail::expect_with(|_| {
            let settings = Settings::load(&table("format = \"json\""), &SettingsOverrides::default()).unwrap();
            assert_eq!(settings.format, ReportFormat::Json);
            assert!(!settings.show_allowed);
            Ok(())
        });
    }

    #[test]
    fn test_env_over_policy_and_flags_over_env() {
        Jail::expect_with(|jail| {
            jail.set_env("LATTICE_SHOW_ALLOWED", "true");
            jail.set_env("LATTICE_FORMAT", "json");
            let policy = table("format = \"text\"\nshow_allowed = false");

            let settings = Settings::load(&policy, &SettingsOverrides::default()).unwrap();
            assert!(settings.show_allowed);
            assert_eq!(settings.format, ReportFormat::Json);

            let overrides = SettingsOverrides {
                format: Some(ReportFormat::Text),
                show_allowed: None,
            };
            let settings = Settings::load(&policy, &overrides).unwrap();
            assert_eq!(settings.format, ReportFormat::Text);
            assert!(settings.show_allowed);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_format_is_an_error() {
        Jail::expect_with(|_| {
            let err = Settings::load(&table("format = \"yaml\""), &SettingsOverrides::default()).unwrap_err();
            assert!(matches!(err, ConfigError::Settings(_)));
            Ok(())
        });
    }
}
