//! Request specification type

use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::{Header, Headers, HttpMethod, RequestBody};
use crate::error::{DomainError, DomainResult};

/// Complete specification for an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Unique identifier, used to correlate log lines
    pub id: Uuid,
    /// Human-readable name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// HTTP headers
    pub headers: Headers,
    /// Request body
    pub body: RequestBody,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a new request specification with default values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            method: HttpMethod::default(),
            url: String::new(),
            headers: Headers::new(),
            body: RequestBody::none(),
            timeout_ms: None,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            ..Self::new(name)
        }
    }

    /// Creates a POST request carrying `payload` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn post_json<T: Serialize>(
        name: impl Into<String>,
        url: impl Into<String>,
        payload: &T,
    ) -> DomainResult<Self> {
        Ok(Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: RequestBody::json_of(payload)?,
            ..Self::new(name)
        })
    }

    /// Creates a POST request whose body is sent exactly as given.
    #[must_use]
    pub fn post_raw_json(
        name: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: RequestBody::raw_json(content),
            ..Self::new(name)
        }
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.add(header);
        self
    }

    /// Sets the timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Validates the URL and returns the parsed version.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or not http(s).
    pub fn parse_url(&self) -> DomainResult<Url> {
        let url = Url::parse(&self.url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{other}': {}",
                self.url
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_request() {
        let req = RequestSpec::get("profile", "http://127.0.0.1:3389/api/v1/profile")
            .with_header(Header::new("X-User-ID", "42"));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.headers.get("X-User-ID"), Some("42"));
        assert_eq!(req.body, RequestBody::none());
        assert_eq!(req.timeout_ms, None);
    }

    #[test]
    fn test_post_json_request() {
        let req = RequestSpec::post_json(
            "register",
            "http://localhost/api/v1/register",
            &serde_json::json!({"username": "u"}),
        )
        .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.content, r#"{"username":"u"}"#);
    }

    #[test]
    fn test_post_raw_json_request() {
        let req = RequestSpec::post_raw_json("login", "http://localhost/api/v1/login", "{\"a\":");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body, RequestBody::raw_json("{\"a\":"));
    }

    #[test]
    fn test_parse_url() {
        assert!(RequestSpec::get("ok", "https://example.com/x").parse_url().is_ok());
        assert!(RequestSpec::get("bad", "not a url").parse_url().is_err());
        assert!(RequestSpec::get("ftp", "ftp://example.com").parse_url().is_err());
    }
}
