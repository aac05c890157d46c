//! Output formatting utilities

use anyhow::{Context, Result};
use audit_lib::report::{COLUMNS_EN, COLUMNS_JA};
use audit_lib::ReportRow;
use chrono::{DateTime, FixedOffset, Utc};
use clap::ValueEnum;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Byte order mark so spreadsheet tools detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Language of the report file header row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum HeaderLanguage {
    #[default]
    En,
    Ja,
}

impl HeaderLanguage {
    pub fn columns(&self) -> [&'static str; 12] {
        match self {
            HeaderLanguage::En => COLUMNS_EN,
            HeaderLanguage::Ja => COLUMNS_JA,
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// `inactive_endpoints_<YYYYmmdd_HHMMSS>.csv` in local time of `now`
pub fn report_file_name(now: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "inactive_endpoints_{}.csv",
        now.with_timezone(&offset).format("%Y%m%d_%H%M%S")
    )
}

/// Resolve where the report goes: an explicit path wins over the directory
pub fn report_path(
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> PathBuf {
    output.unwrap_or_else(|| {
        output_dir
            .unwrap_or_else(|| PathBuf::from("."))
            .join(report_file_name(now, offset))
    })
}

/// Render the report as UTF-8 CSV with a BOM
pub fn render_csv(rows: &[ReportRow], language: HeaderLanguage) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut wtr = csv::Writer::from_writer(&mut buffer);
        wtr.write_record(language.columns())?;
        for row in rows {
            wtr.write_record(row.to_record())?;
        }
        wtr.flush().context("CSV writer error")?;
    }
    Ok(buffer)
}

/// Write the report file
pub fn write_csv(path: &Path, rows: &[ReportRow], language: HeaderLanguage) -> Result<()> {
    let data = render_csv(rows, language)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(&data).context("Failed to write report file")?;
    Ok(())
}

/// Color usage pattern labels
pub fn color_pattern(pattern: &str) -> String {
    match pattern {
        "Consistent" => pattern.red().to_string(),
        "Sporadic" => pattern.yellow().to_string(),
        _ => pattern.to_string(),
    }
}

/// Color trend labels
pub fn color_trend(trend: &str) -> String {
    match trend {
        "Increasing" => trend.red().to_string(),
        "Decreasing" => trend.green().to_string(),
        _ => trend.dimmed().to_string(),
    }
}
