//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("CORS origin must include an http(s) scheme: {0}")]
    InvalidOrigin(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid provider timeout")]
    InvalidProviderTimeout,

    #[error("Delegated intent mode needs an AI provider")]
    DelegatedWithoutProvider,

    #[error("Value for {field} out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}
