//! Usage pattern and trend labelling

use crate::models::{DataPoint, HitTrend, RawSeries, UsagePattern, UsageRecord};

/// Share of sampled days that must be active for a resource to be consistent
pub const CONSISTENT_RATIO: f64 = 0.7;

/// Minimum active points before a trend is reported
const MIN_TREND_POINTS: usize = 3;

/// Label a record using the series it was aggregated from
pub fn classify(record: UsageRecord, series: &RawSeries) -> UsageRecord {
    let active = series.active_points();
    UsageRecord {
        usage_pattern: usage_pattern(series.points.len(), active.len()),
        hit_trend: hit_trend(&active),
        ..record
    }
}

/// `Consistent` when strictly more than 70% of samples are active
pub fn usage_pattern(sample_count: usize, active_count: usize) -> UsagePattern {
    if active_count as f64 > CONSISTENT_RATIO * sample_count as f64 {
        UsagePattern::Consistent
    } else {
        UsagePattern::Sporadic
    }
}

/// Compare the first and last active values; `active` must be timestamp-ordered
pub fn hit_trend(active: &[DataPoint]) -> HitTrend {
    if active.len() < MIN_TREND_POINTS {
        return HitTrend::Stable;
    }

    let first = active.first().and_then(|p| p.value);
    let last = active.last().and_then(|p| p.value);
    match (first, last) {
        (Some(first), Some(last)) if last > first => HitTrend::Increasing,
        (Some(first), Some(last)) if last < first => HitTrend::Decreasing,
        _ => HitTrend::Stable,
    }
}
