//! CLI subcommands

pub mod report;
pub mod windows;

use anyhow::Result;
use audit_lib::window::{DEFAULT_HISTORICAL_DAYS, DEFAULT_RECENT_DAYS};
use audit_lib::{AuditConfig, QuerySpec};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;

use crate::config::{parse_utc_offset, Config, DEFAULT_UTC_OFFSET};

/// Options shared by every command that builds queries
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Metric counting requests per resource
    #[arg(long)]
    pub hits_metric: Option<String>,

    /// Metric counting errored requests per resource
    #[arg(long)]
    pub errors_metric: Option<String>,

    /// Tag filter for both queries (e.g. "service:web,env:prod")
    #[arg(long)]
    pub filter: Option<String>,

    /// Tag the series are grouped by
    #[arg(long)]
    pub group_by: Option<String>,

    /// Length of the historical window in days [default: 365]
    #[arg(long)]
    pub historical_days: Option<u32>,

    /// Length of the recent window in days [default: 90]
    #[arg(long)]
    pub recent_days: Option<u32>,

    /// UTC offset for report dates (e.g. +09:00) [default: +09:00]
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<String>,
}

impl QueryArgs {
    /// Merge flags over the config file over built-in defaults
    pub fn resolve(
        &self,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Result<(AuditConfig, FixedOffset)> {
        let defaults = QuerySpec::default();
        let query = QuerySpec {
            hits_metric: pick(&self.hits_metric, &config.hits_metric, defaults.hits_metric),
            errors_metric: pick(&self.errors_metric, &config.errors_metric, defaults.errors_metric),
            filter: pick(&self.filter, &config.filter, defaults.filter),
            group_by: pick(&self.group_by, &config.group_by, defaults.group_by),
        };

        let audit = AuditConfig {
            query,
            now,
            historical_days: self
                .historical_days
                .or(config.historical_days)
                .unwrap_or(DEFAULT_HISTORICAL_DAYS),
            recent_days: self
                .recent_days
                .or(config.recent_days)
                .unwrap_or(DEFAULT_RECENT_DAYS),
        };

        let offset = parse_utc_offset(&pick(
            &self.utc_offset,
            &config.utc_offset,
            DEFAULT_UTC_OFFSET.to_string(),
        ))?;

        Ok((audit, offset))
    }
}

fn pick(flag: &Option<String>, file: &Option<String>, default: String) -> String {
    flag.clone().or_else(|| file.clone()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let (audit, offset) = QueryArgs::default().resolve(&Config::default(), now()).unwrap();
        assert_eq!(audit.query.hits_metric, "trace.rack.request.hits");
        assert_eq!(audit.query.group_by, "resource_name");
        assert_eq!(audit.historical_days, 365);
        assert_eq!(audit.recent_days, 90);
        assert_eq!(audit.now, now());
        assert_eq!(offset.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config {
            filter: Some("service:api".to_string()),
            recent_days: Some(30),
            historical_days: Some(180),
            utc_offset: Some("+00:00".to_string()),
            ..Default::default()
        };
        let args = QueryArgs {
            recent_days: Some(60),
            utc_offset: Some("-03:00".to_string()),
            ..Default::default()
        };

        let (audit, offset) = args.resolve(&config, now()).unwrap();
        assert_eq!(audit.query.filter, "service:api");
        assert_eq!(audit.recent_days, 60);
        assert_eq!(audit.historical_days, 180);
        assert_eq!(offset.local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_bad_offset() {
        let args = QueryArgs {
            utc_offset: Some("JST".to_string()),
            ..Default::default()
        };
        assert!(args.resolve(&Config::default(), now()).is_err());
    }
}
