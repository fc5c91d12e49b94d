//! Error types for the honeypot agent

use thiserror::Error;

/// Result type alias for honeypot operations
pub type Result<T> = std::result::Result<T, HoneypotError>;

#[derive(Error, Debug)]
pub enum HoneypotError {

    // =============================
    // Core Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Callback error: {0}")]
    CallbackError(String),

    #[error("Intake rejected payload with status {0}")]
    IntakeStatus(u16),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
