//! Error-rate join
//!
//! Merges historical error counts into usage records by resource key.

use crate::models::{RawSeries, UsageRecord};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Usage records keyed by resource
pub type UsageMap = BTreeMap<String, UsageRecord>;

/// Produce a new map with `error_rate` filled from matching error series
///
/// Error series for resources missing from `usage` are ignored. When a key
/// occurs in more than one error series the last one wins.
pub fn join_error_rates(usage: UsageMap, errors: &[RawSeries]) -> UsageMap {
    let totals: HashMap<&str, f64> = errors
        .iter()
        .map(|series| (series.resource_key.as_str(), series.total()))
        .collect();

    usage
        .into_iter()
        .map(|(key, record)| {
            let error_rate = match totals.get(key.as_str()) {
                Some(total_errors) => error_rate(*total_errors, record.total_hits),
                None => 0.0,
            };
            if error_rate > 0.0 {
                debug!(resource = %key, error_rate, "Joined error rate");
            }
            (key, UsageRecord { error_rate, ..record })
        })
        .collect()
}

/// Errors as a percentage of hits; 0 when there were no hits
pub fn error_rate(total_errors: f64, total_hits: f64) -> f64 {
    if total_hits > 0.0 {
        total_errors / total_hits * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;

    fn record(key: &str, total_hits: f64) -> (String, UsageRecord) {
        let record = UsageRecord {
            total_hits,
            ..UsageRecord::empty(key)
        };
        (key.to_string(), record)
    }

    fn errors(key: &str, values: &[Option<f64>]) -> RawSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint::new(i as i64, *v))
            .collect();
        RawSeries::new(key, points)
    }

    #[test]
    fn test_error_rate_percentage() {
        let usage: UsageMap = [record("Users::Show", 200.0)].into_iter().collect();
        let errors = [errors("Users::Show", &[Some(4.0), None, Some(6.0)])];
        let joined = join_error_rates(usage, &errors);
        assert!((joined["Users::Show"].error_rate - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_hits_zero_rate() {
        let usage: UsageMap = [record("Ping", 0.0)].into_iter().collect();
        let joined = join_error_rates(usage, &[errors("Ping", &[Some(10.0)])]);
        assert_eq!(joined["Ping"].error_rate, 0.0);
    }

    #[test]
    fn test_unknown_resources_ignored() {
        let usage: UsageMap = [record("A", 10.0)].into_iter().collect();
        let joined = join_error_rates(usage, &[errors("B", &[Some(3.0)])]);
        assert_eq!(joined.len(), 1);
        assert!(!joined.contains_key("B"));
        assert_eq!(joined["A"].error_rate, 0.0);
    }

    #[test]
    fn test_last_error_series_wins() {
        let usage: UsageMap = [record("A", 100.0)].into_iter().collect();
        let joined = join_error_rates(
            usage,
            &[errors("A", &[Some(50.0)]), errors("A", &[Some(1.0)])],
        );
        assert!((joined["A"].error_rate - 1.0).abs() < 1e-9);
    }
}
