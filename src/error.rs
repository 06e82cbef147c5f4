//! Engine error taxonomy.
//!
//! Every failure is deterministic: the same inputs always produce the same
//! error. There is no I/O inside the engine, so nothing is retried.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by the planning engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// An out-of-range or non-positive parameter (bandwidth, parallelism,
    /// wave size, cost rate, ratio) or a malformed resource record.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// An external collaborator (inventory or target store) failed.
    #[error("Data source error: {0}")]
    Source(String),
    /// A scenario worker thread panicked.
    #[error("Scenario worker failed: {0}")]
    Worker(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidConfiguration`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

impl From<Vec<ValidationError>> for EngineError {
    fn from(errors: Vec<ValidationError>) -> Self {
        let joined = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self::InvalidConfiguration(joined)
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}
