//! Response specification type
//!
//! Contains types for representing HTTP responses: status code, body,
//! content type and timing.

use std::time::Duration;

use serde::de::DeserializeOwned;

/// Status codes the checks compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 200 OK
    pub const OK: Self = Self(200);
    /// 401 Unauthorized
    pub const UNAUTHORIZED: Self = Self(401);

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

/// HTTP response specification.
///
/// Contains everything the runner reads from an HTTP call. The body is kept
/// as received (lossily decoded as UTF-8) so it can be echoed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Response body as string.
    pub body: String,
    /// Content-Type header value, if the server sent one.
    pub content_type: Option<String>,
    /// Response time.
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    #[must_use]
    pub fn new(
        status: u16,
        content_type: Option<String>,
        body: &[u8],
        duration: Duration,
    ) -> Self {
        Self {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
            content_type,
            duration,
        }
    }

    /// Decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
