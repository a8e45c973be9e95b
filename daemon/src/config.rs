//! Daemon configuration with TOML file support.

use attest_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the daemon.
///
/// Every key is optional in the TOML file; CLI flags and `ATTEST_*`
/// environment variables override file values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Principal fixed as the registry administrator at construction.
    #[serde(default = "default_administrator")]
    pub administrator: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Restore from this snapshot at start (if present) and write to it after replay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_administrator() -> String {
    "admin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.administrator.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "administrator must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            administrator: default_administrator(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            snapshot_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DaemonConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.administrator, "admin");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.snapshot_path, None);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            administrator = "curator"
            log_format = "json"
            snapshot_path = "/var/lib/attest/registry.snap"
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.administrator, "curator");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.snapshot_path,
            Some(PathBuf::from("/var/lib/attest/registry.snap"))
        );
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn empty_administrator_rejected() {
        let err = DaemonConfig::from_toml_str(r#"administrator = "  ""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_log_format_rejected() {
        let err = DaemonConfig::from_toml_str(r#"log_format = "xml""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "administrator = \"museum\"").unwrap();
        let config = DaemonConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.administrator, "museum");
    }

    #[test]
    fn missing_file_returns_read_error() {
        let result = DaemonConfig::from_toml_file(Path::new("/nonexistent/attest.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
