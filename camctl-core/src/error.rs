//! Error types for camctl-core

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that fail fast instead of being folded into an outcome
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid device address: {0}")]
    InvalidAddress(String),

    #[error("Invalid policy '{value}', expected one of: {expected}")]
    InvalidPolicy { value: String, expected: &'static str },
}

/// Errors reported by a device session provider or its handles
///
/// These never escape the session manager as `Err`. They are kept as the
/// cause of an offline session or an `unsupported` outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Device rejected request: {0}")]
    Rejected(String),

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Request timed out")]
    Timeout,
}
