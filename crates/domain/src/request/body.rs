//! HTTP Request body types

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// The kind of request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestBodyKind {
    /// No body
    #[default]
    None,
    /// JSON document; must parse before it is sent
    Json,
    /// Sent verbatim as `application/json`, even when empty or malformed
    RawJson,
}

/// HTTP request body with content and type information.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestBody {
    /// The kind of body
    pub kind: RequestBodyKind,
    /// The body content as a string
    pub content: String,
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RequestBodyKind::None,
            content: String::new(),
        }
    }

    /// Creates a JSON body from already-encoded text.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self {
            kind: RequestBodyKind::Json,
            content: content.into(),
        }
    }

    /// Creates a body labelled as JSON whose content is not checked.
    #[must_use]
    pub fn raw_json(content: impl Into<String>) -> Self {
        Self {
            kind: RequestBodyKind::RawJson,
            content: content.into(),
        }
    }

    /// Serializes `value` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the value cannot be serialized.
    pub fn json_of<T: Serialize>(value: &T) -> DomainResult<Self> {
        serde_json::to_string(value)
            .map(Self::json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self.kind {
            RequestBodyKind::None => None,
            RequestBodyKind::Json | RequestBodyKind::RawJson => Some("application/json"),
        }
    }
}
