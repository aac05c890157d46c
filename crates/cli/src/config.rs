//! Configuration management for the CLI
//!
//! Every field is optional; command-line flags and environment variables take
//! precedence, then the config file, then built-in defaults.

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Offset used for report dates when nothing else is configured
pub const DEFAULT_UTC_OFFSET: &str = "+09:00";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Metrics provider API URL
    pub api_url: Option<String>,
    /// Metric counting requests per resource
    pub hits_metric: Option<String>,
    /// Metric counting errored requests per resource
    pub errors_metric: Option<String>,
    /// Tag filter applied to both queries
    pub filter: Option<String>,
    /// Tag the series are grouped by
    pub group_by: Option<String>,
    pub historical_days: Option<u32>,
    pub recent_days: Option<u32>,
    /// Offset for report dates and file names, e.g. `+09:00`
    pub utc_offset: Option<String>,
    /// Directory the report file is written to
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("endpoint-audit").join("config.json"))
    }
}

/// Parse a `+HH:MM` / `-HH:MM` offset
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    value
        .parse::<FixedOffset>()
        .with_context(|| format!("Invalid UTC offset '{}', expected e.g. +09:00", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "filter": "service:web", "recent_days": 30, "utc_offset": "+00:00" }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.filter.as_deref(), Some("service:web"));
        assert_eq!(config.recent_days, Some(30));
        assert_eq!(config.historical_days, None);
        assert_eq!(config.utc_offset.as_deref(), Some("+00:00"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(
            parse_utc_offset(DEFAULT_UTC_OFFSET).unwrap(),
            FixedOffset::east_opt(9 * 3600).unwrap()
        );
        assert_eq!(
            parse_utc_offset("-05:30").unwrap(),
            FixedOffset::west_opt(5 * 3600 + 1800).unwrap()
        );
        assert!(parse_utc_offset("Tokyo").is_err());
    }
}
