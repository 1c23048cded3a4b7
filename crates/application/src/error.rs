//! Application error types

use smoke_domain::DomainError;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A request could not be built.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] HttpClientError),

    /// A response body the runner needs to read was not the expected JSON.
    #[error("could not decode {step} response: {message}")]
    Decode {
        /// Step whose response failed to decode.
        step: String,
        /// Parser message.
        message: String,
    },

    /// A check received the wrong status code.
    #[error("{check}: expected status {expected}, got {actual}")]
    StatusMismatch {
        /// Check name.
        check: String,
        /// Expected status.
        expected: u16,
        /// Status actually received.
        actual: u16,
    },

    /// A check failed on something other than its status code.
    #[error("{check}: {reason}")]
    CheckFailed {
        /// Check name.
        check: String,
        /// First failing assertion.
        reason: String,
    },
}

impl ApplicationError {
    /// True for failures that prevented a response from being received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
