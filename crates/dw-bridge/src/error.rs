//! Bridge errors
//!
//! The host service never reports failures synchronously, so these only cover
//! what the bridge can detect locally.

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Profile payload construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// A SET_CONFIG payload must carry exactly one plugin subsection
    #[error("Profile '{0}' has no plugin configuration")]
    MissingPlugin(String),
}

/// Errors returned to the UI layer for a recognised method
#[derive(Debug, Error)]
pub enum MethodError {
    #[error("Invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },
}
