//! Show the query windows without contacting the provider

use anyhow::Result;
use audit_lib::{AuditConfig, TimeRange};
use chrono::FixedOffset;
use colored::Colorize;
use serde_json::json;

use crate::output::OutputFormat;

/// Print the historical/recent windows and the queries a report would send
pub fn show_windows(audit: &AuditConfig, offset: FixedOffset, format: OutputFormat) -> Result<()> {
    let windows = audit.windows()?;

    match format {
        OutputFormat::Json => {
            let value = json!({
                "windows": windows,
                "hits_query": audit.query.hits_query(),
                "errors_query": audit.query.errors_query(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            println!("{}", "Audit Windows".bold());
            println!("{}", "=".repeat(60));
            println!(
                "Historical:   {}",
                describe(&windows.historical, offset).cyan()
            );
            println!("Recent:       {}", describe(&windows.recent, offset).cyan());
            println!();
            println!("{}", "Queries".bold());
            println!("{}", "-".repeat(60));
            println!("Hits:         {}", audit.query.hits_query());
            println!("Errors:       {}", audit.query.errors_query());
        }
    }

    Ok(())
}

fn describe(range: &TimeRange, offset: FixedOffset) -> String {
    format!(
        "{} -> {} ({} days)",
        range.start.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
        range.end.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
        range.days()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_lib::AuditWindows;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_describe_range() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let windows = AuditWindows::ending_at(now, 365, 90).unwrap();
        let text = describe(&windows.recent, FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(text, "2024-04-01 09:00 -> 2024-06-30 09:00 (90 days)");
    }
}
