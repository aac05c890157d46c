//! Endpoint Audit CLI
//!
//! Finds API endpoints that served traffic over a historical window but went
//! silent recently, and writes a ranked report for deprecation review.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use audit_lib::Credentials;
use chrono::Utc;
use clap::{Parser, Subcommand};
use commands::{report, windows, QueryArgs};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Endpoint Audit CLI
#[derive(Parser)]
#[command(name = "endpoint-audit")]
#[command(author, version, long_about = None)]
#[command(about = "Find API endpoints with no recent traffic (Endpoint Audit)")]
pub struct Cli {
    /// Metrics API URL (can also be set via DD_API_URL env var)
    #[arg(long, env = "DD_API_URL")]
    pub api_url: Option<String>,

    /// Path to the config file (defaults to ~/.config/endpoint-audit/config.json)
    #[arg(long, env = "ENDPOINT_AUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch metrics and write the inactive endpoint report
    Report {
        /// Provider API key
        #[arg(long, env = "DD_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Provider application key
        #[arg(long, env = "DD_APP_KEY", hide_env_values = true)]
        app_key: Option<String>,

        #[command(flatten)]
        query: QueryArgs,

        /// Report file path (overrides --output-dir)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Directory for the generated report file
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Header row language of the report file
        #[arg(long, default_value = "en")]
        headers: output::HeaderLanguage,

        /// Show at most this many rows on screen
        #[arg(long)]
        limit: Option<usize>,

        /// HTTP request timeout in seconds [default: 30]
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show the query windows and queries without fetching anything
    Windows {
        #[command(flatten)]
        query: QueryArgs,
    },
}

const DEFAULT_API_URL: &str = "https://api.datadoghq.com";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let file_config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };
    let now = Utc::now();

    match cli.command {
        Commands::Report {
            api_key,
            app_key,
            query,
            output,
            output_dir,
            headers,
            limit,
            timeout,
        } => {
            let credentials = match Credentials::new(api_key, app_key) {
                Ok(credentials) => credentials,
                Err(e) => {
                    output::print_error(&e.to_string());
                    output::print_info(
                        "Set DD_API_KEY and DD_APP_KEY, or pass --api-key/--app-key",
                    );
                    return Err(e.into());
                }
            };

            let (audit, offset) = query.resolve(&file_config, now)?;
            let api_url = cli
                .api_url
                .or(file_config.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string());
            let timeout = timeout
                .or(file_config.timeout_secs)
                .unwrap_or(config::DEFAULT_TIMEOUT_SECS);

            info!(%api_url, timeout_secs = timeout, "Starting audit");
            let client =
                client::ApiClient::new(&api_url, credentials, Duration::from_secs(timeout))?;

            let options = report::ReportOptions {
                path: output::report_path(
                    output,
                    output_dir.or(file_config.output_dir.clone()),
                    now,
                    offset,
                ),
                headers,
                offset,
                limit,
            };
            report::run_report(&client, &audit, &options, cli.format).await?;
        }
        Commands::Windows { query } => {
            let (audit, offset) = query.resolve(&file_config, now)?;
            windows::show_windows(&audit, offset, cli.format)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for tables and JSON
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
