//! Endpoint table of the API under test.
//!
//! | Call | Method | Path |
//! |---|---|---|
//! | register | POST | `/register` |
//! | profile | GET | `/profile` (optionally with `X-User-ID`) |
//! | login | POST | `/login` |

use smoke_domain::request::{Header, RequestSpec};
use smoke_domain::{DomainError, DomainResult, LoginRequest, RegisterRequest, UserId};
use url::Url;

/// Header the profile endpoint identifies the caller by.
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3389/api/v1";

/// Base URL plus per-request settings shared by every call of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    base_url: String,
    timeout_ms: Option<u64>,
}

impl ApiTarget {
    /// Creates a target rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` unless `base_url` is an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> DomainResult<Self> {
        let parsed =
            Url::parse(base_url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "base URL must use http or https: {base_url}"
            )));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms: None,
        })
    }

    /// Sets the per-request timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout, if any.
    #[must_use]
    pub const fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /register` with `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn register(&self, body: &RegisterRequest) -> DomainResult<RequestSpec> {
        Ok(RequestSpec::post_json("register", self.url("/register"), body)?
            .with_timeout_ms(self.timeout_ms))
    }

    /// `GET /profile`, identified by `user_id` when given.
    #[must_use]
    pub fn profile(&self, user_id: Option<&UserId>) -> RequestSpec {
        let request =
            RequestSpec::get("profile", self.url("/profile")).with_timeout_ms(self.timeout_ms);
        match user_id {
            Some(id) => request.with_header(Header::new(USER_ID_HEADER, id.as_str())),
            None => request,
        }
    }

    /// `POST /login` with `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn login(&self, body: &LoginRequest) -> DomainResult<RequestSpec> {
        Ok(RequestSpec::post_json("login", self.url("/login"), body)?
            .with_timeout_ms(self.timeout_ms))
    }

    /// `POST /login` with `content` sent as-is, even when it is not valid JSON.
    #[must_use]
    pub fn login_raw(&self, content: &str) -> RequestSpec {
        RequestSpec::post_raw_json("login", self.url("/login"), content)
            .with_timeout_ms(self.timeout_ms)
    }
}

impl Default for ApiTarget {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}
