//! Core data models for the endpoint audit

use serde::{Deserialize, Serialize};
use std::fmt;

/// One sample of a metric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// `None` when the provider had no data for the sample
    pub value: Option<f64>,
}

impl DataPoint {
    pub fn new(timestamp_ms: i64, value: Option<f64>) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// A point counts as active when it carries a strictly positive value
    pub fn is_active(&self) -> bool {
        matches!(self.value, Some(v) if v > 0.0)
    }
}

/// Per-resource time series with the scope prefix already stripped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub resource_key: String,
    pub points: Vec<DataPoint>,
}

impl RawSeries {
    pub fn new(resource_key: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            resource_key: resource_key.into(),
            points,
        }
    }

    /// Sum of every present value
    pub fn total(&self) -> f64 {
        self.points.iter().filter_map(|p| p.value).sum()
    }

    /// Active points, ordered by timestamp ascending
    pub fn active_points(&self) -> Vec<DataPoint> {
        let mut active: Vec<DataPoint> = self
            .points
            .iter()
            .copied()
            .filter(DataPoint::is_active)
            .collect();
        active.sort_by_key(|p| p.timestamp_ms);
        active
    }
}

/// How regularly a resource was called over the historical window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsagePattern {
    Consistent,
    #[default]
    Sporadic,
}

impl UsagePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsagePattern::Consistent => "Consistent",
            UsagePattern::Sporadic => "Sporadic",
        }
    }
}

impl fmt::Display for UsagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of traffic between the first and last active sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl HitTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitTrend::Increasing => "Increasing",
            HitTrend::Decreasing => "Decreasing",
            HitTrend::Stable => "Stable",
        }
    }
}

impl fmt::Display for HitTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage statistics for a single resource over the historical window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub resource_key: String,
    pub total_hits: f64,
    /// Mean over active days, 0 when there are none
    pub avg_hits: f64,
    /// Max over active days, 0 when there are none
    pub max_hits: f64,
    pub active_days: usize,
    pub last_active_ms: Option<i64>,
    pub usage_pattern: UsagePattern,
    pub hit_trend: HitTrend,
    /// Percentage of hits that errored
    pub error_rate: f64,
}

impl UsageRecord {
    /// Zero-valued record for a resource with no usable data
    pub fn empty(resource_key: impl Into<String>) -> Self {
        Self {
            resource_key: resource_key.into(),
            total_hits: 0.0,
            avg_hits: 0.0,
            max_hits: 0.0,
            active_days: 0,
            last_active_ms: None,
            usage_pattern: UsagePattern::default(),
            hit_trend: HitTrend::default(),
            error_rate: 0.0,
        }
    }
}

/// Three-part decomposition of a `::` separated resource key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSegments {
    pub head: String,
    pub middle: String,
    pub tail: String,
}

/// A resource that was used historically but not in the recent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactiveEndpoint {
    #[serde(flatten)]
    pub record: UsageRecord,
    pub segments: ResourceSegments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_activity() {
        assert!(DataPoint::new(0, Some(1.0)).is_active());
        assert!(!DataPoint::new(0, Some(0.0)).is_active());
        assert!(!DataPoint::new(0, Some(-3.0)).is_active());
        assert!(!DataPoint::new(0, None).is_active());
    }

    #[test]
    fn test_active_points_sorted_by_timestamp() {
        let series = RawSeries::new(
            "Home::Index",
            vec![
                DataPoint::new(3_000, Some(3.0)),
                DataPoint::new(1_000, Some(1.0)),
                DataPoint::new(2_000, None),
            ],
        );
        let active = series.active_points();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].timestamp_ms, 1_000);
        assert_eq!(active[1].timestamp_ms, 3_000);
    }

    #[test]
    fn test_total_skips_absent_values() {
        let series = RawSeries::new(
            "Ping",
            vec![
                DataPoint::new(1, Some(2.5)),
                DataPoint::new(2, None),
                DataPoint::new(3, Some(0.5)),
            ],
        );
        assert_eq!(series.total(), 3.0);
    }

    #[test]
    fn test_labels_display() {
        assert_eq!(UsagePattern::Consistent.to_string(), "Consistent");
        assert_eq!(HitTrend::Decreasing.to_string(), "Decreasing");
        assert_eq!(UsageRecord::empty("x").usage_pattern, UsagePattern::Sporadic);
    }
}
