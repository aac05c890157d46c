//! Inactive endpoint report command

use anyhow::Result;
use audit_lib::{run_audit, AuditConfig, ReportRow};
use chrono::FixedOffset;
use colored::Colorize;
use std::path::PathBuf;
use tabled::Tabled;
use tracing::error;

use crate::client::ApiClient;
use crate::output::{
    color_pattern, color_trend, print_error, print_info, print_success, print_warning,
    write_csv, HeaderLanguage, OutputFormat,
};

/// Row for the inactive endpoints table
#[derive(Tabled)]
struct InactiveRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Hits")]
    total_hits: String,
    #[tabled(rename = "Avg/Day")]
    avg_hits: String,
    #[tabled(rename = "Max/Day")]
    max_hits: String,
    #[tabled(rename = "Active Days")]
    active_days: String,
    #[tabled(rename = "Last Active")]
    last_active: String,
    #[tabled(rename = "Pattern")]
    usage_pattern: String,
    #[tabled(rename = "Trend")]
    hit_trend: String,
    #[tabled(rename = "Errors %")]
    error_rate: String,
}

/// Where and how the report is written
pub struct ReportOptions {
    pub path: PathBuf,
    pub headers: HeaderLanguage,
    pub offset: FixedOffset,
    /// Rows shown on screen; the file always holds every row
    pub limit: Option<usize>,
}

/// Fetch, analyze and write the inactive endpoint report
pub async fn run_report(
    client: &ApiClient,
    audit: &AuditConfig,
    options: &ReportOptions,
    format: OutputFormat,
) -> Result<()> {
    if matches!(format, OutputFormat::Table) {
        print_info("Fetching metrics...");
    }

    let report = match run_audit(client, audit).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Audit failed");
            print_error(&format!("Data retrieval failed: {}", e));
            return Err(e.into());
        }
    };

    let rows: Vec<ReportRow> = report
        .inactive
        .iter()
        .map(|endpoint| ReportRow::new(endpoint, options.offset))
        .collect();

    write_csv(&options.path, &rows, options.headers)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!();
            println!("{}", "Inactive Endpoints".bold());
            println!("{}", "=".repeat(60));
            println!("Historical resources:   {}", report.historical_count);
            println!("Recently active:        {}", report.recent_active_count);
            println!();

            if rows.is_empty() {
                print_warning("No inactive endpoints found");
            } else {
                let shown = options.limit.unwrap_or(rows.len()).min(rows.len());
                let table_rows: Vec<InactiveRow> = rows
                    .iter()
                    .take(shown)
                    .enumerate()
                    .map(|(i, row)| InactiveRow {
                        rank: i + 1,
                        resource: row.resource.clone(),
                        total_hits: row.total_hits.clone(),
                        avg_hits: row.avg_hits.clone(),
                        max_hits: row.max_hits.clone(),
                        active_days: row.active_days.clone(),
                        last_active: row.last_active.clone(),
                        usage_pattern: color_pattern(&row.usage_pattern),
                        hit_trend: color_trend(&row.hit_trend),
                        error_rate: row.error_rate.clone(),
                    })
                    .collect();

                let table = tabled::Table::new(table_rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{}", table);

                if shown < rows.len() {
                    print_info(&format!(
                        "Showing {} of {} rows; the report file has all of them",
                        shown,
                        rows.len()
                    ));
                }
            }

            println!();
            print_success(&format!("Saved results to {}", options.path.display()));
            println!("Total: {} endpoints", rows.len());
        }
    }

    Ok(())
}
