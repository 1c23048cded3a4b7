//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be produced.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A response body does not have the envelope shape.
    #[error("invalid response envelope: {0}")]
    InvalidEnvelope(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
