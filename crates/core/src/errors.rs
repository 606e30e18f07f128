//! Core error types for the devis engine.
//!
//! This module defines transport-agnostic error types. The HTTP client crate
//! converts its transport errors into [`PersistenceError`] before they reach
//! the core services.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::fx::FxError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the quoting engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Quote operation failed: {0}")]
    Quote(#[from] QuoteError),

    #[error("Persistence operation failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by the pricing calculator and the quote lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// A numeric rate, price or quantity is out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The margin rate is outside `[0, 1)`.
    #[error("Invalid margin rate {0}: must satisfy 0 <= rate < 1")]
    InvalidMarginRate(String),

    /// A quote, item or client lookup missed.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The persistence layer rejected or failed a save/confirm/delete.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// A required field is missing or the quote is in the wrong state.
    #[error("Validation failure: {0}")]
    ValidationFailure(String),
}

/// Transport-agnostic error type for remote persistence operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The requested record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The record collides with an existing one (duplicate key).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request could not be sent or timed out.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with an error status.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl Error {
    /// Returns the quote-level error when this error carries one.
    pub fn as_quote_error(&self) -> Option<&QuoteError> {
        match self {
            Error::Quote(e) => Some(e),
            _ => None,
        }
    }

    /// True when the underlying cause is a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Quote(QuoteError::NotFound(_)) | Error::Persistence(PersistenceError::NotFound(_))
        )
    }
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
