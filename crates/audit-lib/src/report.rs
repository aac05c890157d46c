//! Display rows for the inactive endpoint report

use crate::models::InactiveEndpoint;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Marker for resources without any active day
pub const NOT_AVAILABLE: &str = "N/A";

/// Column labels, in row order
pub const COLUMNS_EN: [&str; 12] = [
    "Resource",
    "Resource Part 1",
    "Resource Part 2",
    "Resource Part 3",
    "Historical Hits",
    "Avg Hits/Day",
    "Max Hits/Day",
    "Active Days",
    "Last Active",
    "Usage Pattern",
    "Hit Trend",
    "Error Rate (%)",
];

/// Japanese column labels, in row order
pub const COLUMNS_JA: [&str; 12] = [
    "リソース名",
    "リソース分類1",
    "リソース分類2",
    "リソース分類3",
    "過去期間の呼び出し回数",
    "平均呼び出し回数/日",
    "最大呼び出し回数/日",
    "アクティブだった日数",
    "最後の呼び出し日",
    "使用パターン",
    "呼び出し傾向",
    "エラー率(%)",
];

/// One formatted line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub resource: String,
    pub part1: String,
    pub part2: String,
    pub part3: String,
    pub total_hits: String,
    pub avg_hits: String,
    pub max_hits: String,
    pub active_days: String,
    pub last_active: String,
    pub usage_pattern: String,
    pub hit_trend: String,
    pub error_rate: String,
}

impl ReportRow {
    /// Format an endpoint; dates are rendered in `offset`
    pub fn new(endpoint: &InactiveEndpoint, offset: FixedOffset) -> Self {
        let record = &endpoint.record;
        Self {
            resource: record.resource_key.clone(),
            part1: endpoint.segments.head.clone(),
            part2: endpoint.segments.middle.clone(),
            part3: endpoint.segments.tail.clone(),
            total_hits: format_count(record.total_hits),
            avg_hits: format!("{:.2}", record.avg_hits),
            max_hits: format_count(record.max_hits),
            active_days: record.active_days.to_string(),
            last_active: format_date(record.last_active_ms, offset),
            usage_pattern: record.usage_pattern.to_string(),
            hit_trend: record.hit_trend.to_string(),
            error_rate: format!("{:.2}", record.error_rate),
        }
    }

    /// Fields in column order
    pub fn to_record(&self) -> [&str; 12] {
        [
            self.resource.as_str(),
            self.part1.as_str(),
            self.part2.as_str(),
            self.part3.as_str(),
            self.total_hits.as_str(),
            self.avg_hits.as_str(),
            self.max_hits.as_str(),
            self.active_days.as_str(),
            self.last_active.as_str(),
            self.usage_pattern.as_str(),
            self.hit_trend.as_str(),
            self.error_rate.as_str(),
        ]
    }
}

/// Hit counts print without a fraction when they are whole numbers
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// `YYYY-MM-DD` in the given offset, or `N/A`
pub fn format_date(timestamp_ms: Option<i64>, offset: FixedOffset) -> String {
    timestamp_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::split_resource_name;
    use crate::models::{HitTrend, UsagePattern, UsageRecord};

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_row_formatting() {
        let endpoint = InactiveEndpoint {
            record: UsageRecord {
                resource_key: "Users::Admin::Show".to_string(),
                total_hits: 200.0,
                avg_hits: 13.333333,
                max_hits: 40.0,
                active_days: 15,
                // 2024-01-01T20:00:00Z, already the 2nd in Tokyo
                last_active_ms: Some(1_704_139_200_000),
                usage_pattern: UsagePattern::Sporadic,
                hit_trend: HitTrend::Decreasing,
                error_rate: 5.0,
            },
            segments: split_resource_name("Users::Admin::Show"),
        };

        let row = ReportRow::new(&endpoint, tokyo());
        assert_eq!(
            row.to_record(),
            [
                "Users::Admin::Show",
                "Users",
                "Admin",
                "Show",
                "200",
                "13.33",
                "40",
                "15",
                "2024-01-02",
                "Sporadic",
                "Decreasing",
                "5.00",
            ]
        );
    }

    #[test]
    fn test_missing_date() {
        assert_eq!(format_date(None, tokyo()), NOT_AVAILABLE);
    }

    #[test]
    fn test_date_in_utc() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_date(Some(1_704_139_200_000), utc), "2024-01-01");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(1234.0), "1234");
        assert_eq!(format_count(12.5), "12.50");
    }

    #[test]
    fn test_column_sets_match() {
        assert_eq!(COLUMNS_EN.len(), COLUMNS_JA.len());
    }

    #[test]
    fn test_hits_label_independent_of_window_length() {
        assert_eq!(COLUMNS_EN[4], "Historical Hits");
        assert_eq!(COLUMNS_JA[4], "過去期間の呼び出し回数");
        assert!(COLUMNS_JA.iter().all(|label| !label.contains("ヶ月")));
    }
}
