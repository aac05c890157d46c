//! Time-series aggregation
//!
//! Reduces a raw per-resource point list into the summary statistics of a
//! [`UsageRecord`]. Labels and error rate are left at their defaults; the
//! classifier and joiner fill them in later.

use crate::models::{RawSeries, UsageRecord};

/// Build the usage statistics for one series
pub fn aggregate(series: &RawSeries) -> UsageRecord {
    let active = series.active_points();
    let values: Vec<f64> = active.iter().filter_map(|p| p.value).collect();

    UsageRecord {
        total_hits: series.total(),
        avg_hits: mean(&values),
        max_hits: max(&values),
        active_days: active.len(),
        last_active_ms: active.iter().map(|p| p.timestamp_ms).max(),
        ..UsageRecord::empty(series.resource_key.clone())
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}
