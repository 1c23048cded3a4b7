//! Runner settings.
//!
//! Settings are read from `SMOKE_*` environment variables, after loading a
//! `.env` file from the working directory when one exists.
//!
//! | Variable | Default |
//! |---|---|
//! | `SMOKE_BASE_URL` | `http://127.0.0.1:3389/api/v1` |
//! | `SMOKE_TIMEOUT_MS` | unset (no timeout) |
//! | `SMOKE_LOGIN_CHECKS` | `false` |
//! | `SMOKE_STRICT` | `false` |

use serde::Deserialize;
use smoke_application::endpoints::DEFAULT_BASE_URL;
use smoke_application::{ApiTarget, RunOptions};
use thiserror::Error;

const ENV_PREFIX: &str = "SMOKE";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not usable.
    #[error("invalid {key}: {message}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Settings of one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmokeConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout; requests wait indefinitely when unset.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Also exercise the login endpoint.
    pub login_checks: bool,
    /// Exit with a failure status when any check fails.
    pub strict: bool,
}

impl SmokeConfig {
    /// Loads `.env` (if present) and then the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Builds the configuration from an arbitrary source layered over the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed or is out of range.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("login_checks", false)?
            .set_default("strict", false)?
            .add_source(source)
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                key: "timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        self.target().map(|_| ())
    }

    /// The API this configuration points at.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn target(&self) -> Result<ApiTarget, ConfigError> {
        ApiTarget::new(&self.base_url)
            .map(|target| target.with_timeout_ms(self.timeout_ms))
            .map_err(|e| ConfigError::Invalid {
                key: "base_url",
                message: e.to_string(),
            })
    }

    /// Optional run features.
    #[must_use]
    pub const fn run_options(&self) -> RunOptions {
        RunOptions {
            login_checks: self.login_checks,
        }
    }
}
