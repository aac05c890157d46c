//! Error types for the audit pipeline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    /// A required credential was not provided
    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),

    /// A dataset could not be retrieved
    #[error("failed to fetch {dataset}: {reason}")]
    FetchFailure { dataset: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AuditError {
    pub fn fetch(dataset: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailure {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }
}
