//! Register user use case.

use std::sync::Arc;

use smoke_domain::response::StatusCode;
use smoke_domain::{ApiEnvelope, RegisterOutcome, RegisterRequest, TestIdentity};

use crate::endpoints::ApiTarget;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpClient, Reporter};

/// Registers the run's throwaway account and classifies the answer.
pub struct RegisterUser<C: HttpClient, R: Reporter> {
    client: Arc<C>,
    reporter: Arc<R>,
    target: ApiTarget,
}

impl<C: HttpClient, R: Reporter> RegisterUser<C, R> {
    /// Creates a new `RegisterUser` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, reporter: Arc<R>, target: ApiTarget) -> Self {
        Self {
            client,
            reporter,
            target,
        }
    }

    /// Sends `POST /register` for `identity`.
    ///
    /// Non-200 answers and bodies without a truthy `success` are outcomes,
    /// not errors.
    ///
    /// # Errors
    ///
    /// - `Transport` if no response was received
    /// - `Decode` if a 200 response body is not a JSON object
    pub async fn execute(&self, identity: &TestIdentity) -> ApplicationResult<RegisterOutcome> {
        self.reporter.step("Registering test user...");

        let request = self.target.register(&RegisterRequest::for_identity(identity))?;
        tracing::debug!(
            request_id = %request.id,
            url = %request.url,
            username = %identity.username,
            "sending registration"
        );

        let response = self.client.execute(&request).await?;
        self.reporter.response("Register response", &response);

        if response.status != StatusCode::OK.as_u16() {
            tracing::warn!(status = response.status, "registration rejected");
            return Ok(RegisterOutcome::Rejected {
                status: response.status,
            });
        }

        let envelope = response
            .json::<serde_json::Value>()
            .map_err(|e| e.to_string())
            .and_then(|value| ApiEnvelope::try_from(value).map_err(|e| e.to_string()))
            .map_err(|message| ApplicationError::Decode {
                step: "register".to_string(),
                message: format!(
                    "{message} (content type: {})",
                    response.content_type.as_deref().unwrap_or("none")
                ),
            })?;
        let outcome = RegisterOutcome::from_envelope(&envelope);

        match &outcome {
            RegisterOutcome::Registered { user_id } => {
                tracing::info!(%user_id, elapsed = ?response.duration, "test user registered");
            }
            RegisterOutcome::RegisteredWithoutId => {
                self.reporter
                    .notice("No user id in response body, assuming user id 1");
                tracing::info!("test user registered without a reported id");
            }
            RegisterOutcome::RegisteredWithEmptyId => {
                tracing::warn!(
                    user_id = ?envelope.user_id_value(),
                    "registration reported an empty user id"
                );
            }
            RegisterOutcome::Unconfirmed | RegisterOutcome::Rejected { .. } => {
                tracing::warn!(
                    message = envelope.message().unwrap_or_default(),
                    "registration not confirmed"
                );
            }
        }

        Ok(outcome)
    }
}
