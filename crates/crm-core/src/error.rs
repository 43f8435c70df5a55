//! Error types for the CRM core
//!
//! This module defines all error types used throughout the crate.
//!
//! The taxonomy separates three situations a caller handles differently:
//! - `Validation`: the record breaks field rules; carries every collected
//!   message so the whole request can be rejected at once
//! - `NotSupported`: misuse of a closed set (an address-kind code outside
//!   {"I", "D", "S"}, a delta without its discriminator) — a programmer or
//!   data-corruption error, never silently defaulted
//! - `InvalidInput`: a malformed call (wrong value type in a delta, missing
//!   identifier), distinct from record-level validation

use thiserror::Error;

/// Result type alias for CRM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the CRM system
#[derive(Error, Debug)]
pub enum Error {
    /// Record-level validation failed; all collected messages are attached
    #[error("{message}")]
    Validation {
        /// Summary of the rejection
        message: String,
        /// Every failing check's message, in pipeline order
        errors: Vec<String>,
    },

    /// Entity lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness constraint would be violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Closed-set misuse (unknown discriminator code, missing discriminator)
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Malformed caller input (wrong value type, missing identifier)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backing store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error carrying the full message list
    pub fn validation(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a "not supported" error
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The validation messages, if this is a validation rejection
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(err.to_string())
    }
}
