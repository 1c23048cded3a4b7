//! Account payloads exchanged with the API under test.
//!
//! Covers the throwaway identity a run registers, the registration and
//! login request bodies, and the response envelope every endpoint wraps
//! its payload in.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// User identifier as issued by the registration endpoint.
///
/// Kept as the text the server sent so it can be forwarded verbatim in the
/// `X-User-ID` header, whatever its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(Cow<'static, str>);

impl UserId {
    /// Id used when the server confirms a registration without reporting one.
    pub const FALLBACK: Self = Self(Cow::Borrowed("1"));

    /// Wraps an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Returns the id as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads an id from a JSON value.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`, `[]`, `{}`) carry no id.
    /// Strings are taken as-is; anything else uses its JSON text.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        if !is_truthy(value) {
            return None;
        }
        Some(match value {
            Value::String(s) => Self::new(s.as_str()),
            other => Self::new(other.to_string()),
        })
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credentials of the account a single run registers.
///
/// Usernames embed the unix time in seconds so two runs started in
/// different seconds never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    /// Login name, `testuser_<unix seconds>`
    pub username: String,
    /// `<username>@example.com`
    pub email: String,
    /// Account password
    pub password: String,
}

impl TestIdentity {
    /// Password every generated account is registered with.
    pub const PASSWORD: &'static str = "Password123";

    /// Derives an identity from the given instant.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        let username = format!("testuser_{}", now.timestamp());
        let email = format!("{username}@example.com");
        Self {
            username,
            email,
            password: Self::PASSWORD.to_string(),
        }
    }
}

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username
    pub username: String,
    /// Contact e-mail
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Answer to the anti-bot C++ question
    pub cpp_answer: String,
    /// Which question `cpp_answer` answers
    pub question_index: u32,
}

impl RegisterRequest {
    /// Correct answer to question 0.
    pub const CPP_ANSWER: &'static str = "const";

    /// Builds the registration body for `identity`.
    #[must_use]
    pub fn for_identity(identity: &TestIdentity) -> Self {
        Self {
            username: identity.username.clone(),
            email: identity.email.clone(),
            password: identity.password.clone(),
            cpp_answer: Self::CPP_ANSWER.to_string(),
            question_index: 0,
        }
    }
}

/// Body of `POST /login`. `username` accepts either the username or e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or e-mail
    pub username: String,
    /// Plain-text password
    pub password: String,
}

impl LoginRequest {
    /// Creates a login body.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Response envelope shared by the API's JSON endpoints.
///
/// Only the fields the runner inspects are modelled; everything else is
/// ignored. `success` follows JSON truthiness and defaults to `false`
/// when absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiEnvelope {
    /// Whether the server reports the operation as successful
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    /// Human-readable message, kept untyped since servers disagree on its shape
    #[serde(default)]
    pub message: Option<Value>,
    /// Endpoint-specific payload
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// Returns `message` when the server sent it as a string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().and_then(Value::as_str)
    }

    /// Raw `data.user_id`, when `data` is an object holding that key.
    #[must_use]
    pub fn user_id_value(&self) -> Option<&Value> {
        self.data.as_ref()?.as_object()?.get("user_id")
    }
}

impl TryFrom<Value> for ApiEnvelope {
    type Error = DomainError;

    /// Decodes an envelope; the body must be a JSON object.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !value.is_object() {
            return Err(DomainError::InvalidEnvelope(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| DomainError::InvalidEnvelope(e.to_string()))
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// JSON truthiness: everything except `null`, `false`, zero and empty
/// strings, arrays or objects.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| is_truthy(&value))
}

/// Classified result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// 200 with `success` set and a truthy `data.user_id`.
    Registered {
        /// Id reported by the server
        user_id: UserId,
    },
    /// 200 with `success` set and no `data.user_id` key at all.
    RegisteredWithoutId,
    /// 200 with `success` set but a falsy `data.user_id` (`null`, `0`, `""`...).
    RegisteredWithEmptyId,
    /// 200 whose body lacks a truthy `success`.
    Unconfirmed,
    /// Any status other than 200.
    Rejected {
        /// Status the server answered with
        status: u16,
    },
}

impl RegisterOutcome {
    /// Classifies the decoded body of a 200 response.
    #[must_use]
    pub fn from_envelope(envelope: &ApiEnvelope) -> Self {
        if !envelope.success {
            return Self::Unconfirmed;
        }
        match envelope.user_id_value() {
            None => Self::RegisteredWithoutId,
            Some(raw) => UserId::from_json(raw)
                .map_or(Self::RegisteredWithEmptyId, |user_id| Self::Registered { user_id }),
        }
    }

    /// Id to continue the run with: the reported one, the fallback id when
    /// the server omitted the key, or `None`.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Registered { user_id } => Some(user_id.clone()),
            Self::RegisteredWithoutId => Some(UserId::FALLBACK),
            Self::RegisteredWithEmptyId | Self::Unconfirmed | Self::Rejected { .. } => None,
        }
    }

    /// True when the server confirmed the account exists.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        matches!(
            self,
            Self::Registered { .. } | Self::RegisteredWithoutId | Self::RegisteredWithEmptyId
        )
    }
}
