//! End-to-end audit pipeline
//!
//! Fetches the three datasets one after another through a [`MetricsSource`],
//! then runs aggregation, error join, classification and inactivity
//! detection. Any failed fetch aborts the run before analysis starts.

use crate::aggregator::aggregate;
use crate::classifier::classify;
use crate::detector::{detect_inactive, recent_active_keys};
use crate::error::{AuditError, Result};
use crate::joiner::{join_error_rates, UsageMap};
use crate::models::{InactiveEndpoint, RawSeries};
use crate::series::QueryResponse;
use crate::window::{AuditWindows, TimeRange, DEFAULT_HISTORICAL_DAYS, DEFAULT_RECENT_DAYS};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Provider API credentials
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub app_key: String,
}

impl Credentials {
    /// Both keys must be present and non-blank
    pub fn new(api_key: Option<String>, app_key: Option<String>) -> Result<Self> {
        let api_key = non_blank(api_key).ok_or(AuditError::MissingCredentials("DD_API_KEY"))?;
        let app_key = non_blank(app_key).ok_or(AuditError::MissingCredentials("DD_APP_KEY"))?;
        Ok(Self { api_key, app_key })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("app_key", &"<redacted>")
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Metric names and grouping used to build provider queries
#[derive(Debug, Clone, Serialize)]
pub struct QuerySpec {
    pub hits_metric: String,
    pub errors_metric: String,
    /// Tag filter inside the braces, `*` for everything
    pub filter: String,
    /// Tag the series are grouped by; also the scope prefix to strip
    pub group_by: String,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            hits_metric: "trace.rack.request.hits".to_string(),
            errors_metric: "trace.rack.request.errors".to_string(),
            filter: "*".to_string(),
            group_by: "resource_name".to_string(),
        }
    }
}

impl QuerySpec {
    pub fn hits_query(&self) -> String {
        self.build(&self.hits_metric)
    }

    pub fn errors_query(&self) -> String {
        self.build(&self.errors_metric)
    }

    fn build(&self, metric: &str) -> String {
        format!(
            "sum:{}{{{}}} by {{{}}}.as_count()",
            metric, self.filter, self.group_by
        )
    }
}

/// Everything a run needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub query: QuerySpec,
    pub now: DateTime<Utc>,
    pub historical_days: u32,
    pub recent_days: u32,
}

impl AuditConfig {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            query: QuerySpec::default(),
            now,
            historical_days: DEFAULT_HISTORICAL_DAYS,
            recent_days: DEFAULT_RECENT_DAYS,
        }
    }

    pub fn windows(&self) -> Result<AuditWindows> {
        AuditWindows::ending_at(self.now, self.historical_days, self.recent_days)
    }
}

/// The three datasets a run fetches, in fetch order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    HistoricalHits,
    RecentHits,
    HistoricalErrors,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::HistoricalHits => "historical hits",
            Dataset::RecentHits => "recent hits",
            Dataset::HistoricalErrors => "historical errors",
        }
    }
}

/// Source of metric time series
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Run one query over `range`; any failure aborts the pipeline
    async fn query(&self, query: &str, range: TimeRange) -> Result<QueryResponse>;
}

/// Result of a run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub windows: AuditWindows,
    pub historical_count: usize,
    pub recent_active_count: usize,
    pub inactive: Vec<InactiveEndpoint>,
}

/// Fetch all datasets and analyze them
pub async fn run_audit<S: MetricsSource + ?Sized>(
    source: &S,
    config: &AuditConfig,
) -> Result<AuditReport> {
    let windows = config.windows()?;
    let tag = config.query.group_by.as_str();
    let hits_query = config.query.hits_query();
    let errors_query = config.query.errors_query();

    info!(
        from = %windows.historical.start,
        boundary = %windows.recent.start,
        to = %windows.recent.end,
        "Fetching metrics"
    );

    let historical = fetch(
        source,
        Dataset::HistoricalHits,
        &hits_query,
        windows.historical,
        tag,
    )
    .await?;
    let recent = fetch(source, Dataset::RecentHits, &hits_query, windows.recent, tag).await?;
    let errors = fetch(
        source,
        Dataset::HistoricalErrors,
        &errors_query,
        windows.historical,
        tag,
    )
    .await?;

    let historical_count = historical.len();
    let (inactive, recent_active_count) = analyze(&historical, &errors, &recent);

    info!(
        historical = historical_count,
        recent_active = recent_active_count,
        inactive = inactive.len(),
        "Audit complete"
    );

    Ok(AuditReport {
        windows,
        historical_count,
        recent_active_count,
        inactive,
    })
}

async fn fetch<S: MetricsSource + ?Sized>(
    source: &S,
    dataset: Dataset,
    query: &str,
    range: TimeRange,
    tag: &str,
) -> Result<Vec<RawSeries>> {
    let response = source.query(query, range).await.map_err(|e| match e {
        AuditError::FetchFailure { reason, .. } => AuditError::fetch(dataset.as_str(), reason),
        other => other,
    })?;

    if let Some(reason) = response.failure() {
        warn!(dataset = dataset.as_str(), %reason, "Provider reported query error");
        return Err(AuditError::fetch(dataset.as_str(), reason));
    }

    let series = response.into_series(tag);
    info!(dataset = dataset.as_str(), series = series.len(), "Fetched dataset");
    Ok(series)
}

/// Pure analysis over already-fetched series
///
/// Returns the ranked inactive endpoints and the number of recently active
/// resources. A key repeated in `historical` keeps its last series.
pub fn analyze(
    historical: &[RawSeries],
    errors: &[RawSeries],
    recent: &[RawSeries],
) -> (Vec<InactiveEndpoint>, usize) {
    let usage: UsageMap = historical
        .iter()
        .map(|series| (series.resource_key.clone(), classify(aggregate(series), series)))
        .collect();

    let usage = join_error_rates(usage, errors);
    let recent_active = recent_active_keys(recent);
    let inactive = detect_inactive(usage, &recent_active);
    (inactive, recent_active.len())
}
