//! Query windows for the audit
//!
//! The historical window ends where the recent window starts, and the recent
//! window ends at the injected `now`.

use crate::error::{AuditError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const DEFAULT_HISTORICAL_DAYS: u32 = 365;
pub const DEFAULT_RECENT_DAYS: u32 = 90;

/// Half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn from_secs(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn to_secs(&self) -> i64 {
        self.end.timestamp()
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// The two contiguous windows compared by the audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditWindows {
    pub historical: TimeRange,
    pub recent: TimeRange,
}

impl AuditWindows {
    pub fn ending_at(now: DateTime<Utc>, historical_days: u32, recent_days: u32) -> Result<Self> {
        if historical_days == 0 || recent_days == 0 {
            return Err(AuditError::InvalidConfig(format!(
                "window lengths must be positive (historical={}, recent={})",
                historical_days, recent_days
            )));
        }

        let out_of_range = || {
            AuditError::InvalidConfig(format!(
                "window lengths out of range (historical={}, recent={})",
                historical_days, recent_days
            ))
        };
        let boundary = days_before(now, recent_days).ok_or_else(out_of_range)?;
        let start = days_before(boundary, historical_days).ok_or_else(out_of_range)?;

        Ok(Self {
            historical: TimeRange {
                start,
                end: boundary,
            },
            recent: TimeRange {
                start: boundary,
                end: now,
            },
        })
    }
}

fn days_before(instant: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    let span = Duration::try_days(i64::from(days))?;
    instant.checked_sub_signed(span)
}
