//! Inactive endpoint audit library
//!
//! This crate provides the analysis core for:
//! - Aggregating per-resource request series into usage statistics
//! - Classifying usage pattern and traffic trend
//! - Joining historical error counts into error rates
//! - Detecting and ranking endpoints that went silent recently

pub mod aggregator;
pub mod classifier;
pub mod detector;
pub mod error;
pub mod joiner;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod series;
pub mod window;

pub use error::{AuditError, Result};
pub use models::*;
pub use pipeline::{
    analyze, run_audit, AuditConfig, AuditReport, Credentials, Dataset, MetricsSource, QuerySpec,
};
pub use report::ReportRow;
pub use series::QueryResponse;
pub use window::{AuditWindows, TimeRange};
