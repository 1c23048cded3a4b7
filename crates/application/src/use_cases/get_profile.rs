//! Profile retrieval checks.

use std::sync::Arc;

use smoke_domain::response::StatusCode;
use smoke_domain::{Assertion, TestResults, TestSuite, UserId};

use super::log_results;
use crate::endpoints::ApiTarget;
use crate::error::ApplicationResult;
use crate::ports::{HttpClient, Reporter};

/// Name of the authenticated profile check.
pub const PROFILE_CHECK: &str = "get profile";

/// Name of the unauthenticated profile check.
pub const PROFILE_WITHOUT_USER_CHECK: &str = "get profile without user id";

/// Checks `GET /profile` with and without the `X-User-ID` header.
pub struct GetProfile<C: HttpClient, R: Reporter> {
    client: Arc<C>,
    reporter: Arc<R>,
    target: ApiTarget,
}

impl<C: HttpClient, R: Reporter> GetProfile<C, R> {
    /// Creates a new `GetProfile` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, reporter: Arc<R>, target: ApiTarget) -> Self {
        Self {
            client,
            reporter,
            target,
        }
    }

    /// Fetches the profile of `user_id`; passes iff the server answers 200.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if no response was received. A wrong status is
    /// reported in the returned results.
    pub async fn execute(&self, user_id: &UserId) -> ApplicationResult<TestResults> {
        self.reporter
            .step(&format!("Testing profile retrieval (user id: {user_id})..."));
        let suite = TestSuite::new(PROFILE_CHECK)
            .with_assertion(Assertion::status(StatusCode::OK.as_u16()));
        self.check(Some(user_id), &suite).await
    }

    /// Fetches the profile anonymously; passes iff the server answers 401.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if no response was received.
    pub async fn execute_unauthenticated(&self) -> ApplicationResult<TestResults> {
        self.reporter.step("Testing error case (no user id)...");
        let suite = TestSuite::new(PROFILE_WITHOUT_USER_CHECK)
            .with_assertion(Assertion::status(StatusCode::UNAUTHORIZED.as_u16()));
        self.check(None, &suite).await
    }

    async fn check(
        &self,
        user_id: Option<&UserId>,
        suite: &TestSuite,
    ) -> ApplicationResult<TestResults> {
        let request = self.target.profile(user_id);
        tracing::debug!(
            request_id = %request.id,
            url = %request.url,
            user_id = user_id.map(UserId::as_str),
            "fetching profile"
        );

        let response = self.client.execute(&request).await?;
        self.reporter.response("Profile response", &response);

        let results = suite.run(&response);
        log_results(&results);
        Ok(results)
    }
}
