//! Common error types for bridge data

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while decoding bridge data
#[derive(Debug, Error)]
pub enum CoreError {
    /// Scan payload was not valid JSON or lacked a field
    #[error("Invalid scan payload: {0}")]
    InvalidScan(#[from] serde_json::Error),

    /// Timestamp did not match `DD/MM/YYYY HH:MM:SS`
    #[error("Invalid scan timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
