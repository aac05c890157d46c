//! Inactivity detection and ranking
//!
//! An endpoint is inactive when it appears in the historical window but
//! recorded no hits in the recent window. Results are ranked by historical
//! traffic so the busiest silent endpoints come first.

use crate::joiner::UsageMap;
use crate::models::{InactiveEndpoint, RawSeries, ResourceSegments};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Separator between the segments of a resource key
pub const RESOURCE_SEPARATOR: &str = "::";

/// Keys of recent series whose total hits are nonzero
pub fn recent_active_keys(recent: &[RawSeries]) -> BTreeSet<String> {
    recent
        .iter()
        .filter(|series| series.total() > 0.0)
        .map(|series| series.resource_key.clone())
        .collect()
}

/// Historical resources missing from the recent set, ranked
pub fn detect_inactive(
    historical: UsageMap,
    recent_active: &BTreeSet<String>,
) -> Vec<InactiveEndpoint> {
    let mut inactive: Vec<InactiveEndpoint> = historical
        .into_iter()
        .filter(|(key, _)| !recent_active.contains(key))
        .map(|(key, record)| InactiveEndpoint {
            segments: split_resource_name(&key),
            record,
        })
        .collect();

    inactive.sort_by(rank_order);
    inactive
}

/// Total hits descending, then resource key ascending
pub fn rank_order(a: &InactiveEndpoint, b: &InactiveEndpoint) -> Ordering {
    b.record
        .total_hits
        .total_cmp(&a.record.total_hits)
        .then_with(|| a.record.resource_key.cmp(&b.record.resource_key))
}

/// Split `Controller::Namespace::Action` style keys into three parts
pub fn split_resource_name(resource_key: &str) -> ResourceSegments {
    let parts: Vec<&str> = resource_key.split(RESOURCE_SEPARATOR).collect();
    match parts.as_slice() {
        [head, middle @ .., tail] if !middle.is_empty() => ResourceSegments {
            head: head.to_string(),
            middle: middle.join(RESOURCE_SEPARATOR),
            tail: tail.to_string(),
        },
        [head, tail] => ResourceSegments {
            head: head.to_string(),
            middle: tail.to_string(),
            tail: String::new(),
        },
        _ => ResourceSegments {
            head: resource_key.to_string(),
            ..Default::default()
        },
    }
}
