//! Login checks run against the freshly registered account.

use std::sync::Arc;

use serde_json::json;
use smoke_domain::request::RequestSpec;
use smoke_domain::{Assertion, LoginRequest, TestIdentity, TestResults, TestSuite};

use super::log_results;
use crate::endpoints::ApiTarget;
use crate::error::ApplicationResult;
use crate::ports::{HttpClient, Reporter};

/// Password the negative check logs in with.
pub const WRONG_PASSWORD: &str = "wrongPassword123";

/// Username no account is expected to own.
pub const UNKNOWN_USERNAME: &str = "nonexistent_user_123456";

/// E-mail no account is expected to own.
pub const UNKNOWN_EMAIL: &str = "nonexistent_email_123456@example.com";

/// Message the server answers bad credentials with.
pub const BAD_CREDENTIALS_MESSAGE: &str = "用户名或密码错误";

/// Message for an empty login body.
pub const EMPTY_BODY_MESSAGE: &str = "login info is empty";

/// Message for a login body that is not valid JSON.
pub const MALFORMED_BODY_MESSAGE: &str = "login info is not a required json";

/// Truncated JSON sent by the malformed-body check.
const MALFORMED_BODY: &str = r#"{"username":"testuser","password":"password123""#;

/// What a login case sends.
enum Payload {
    Credentials(LoginRequest),
    Raw(&'static str),
}

/// One login attempt and what its response must show.
struct LoginCase {
    name: &'static str,
    payload: Payload,
    suite: TestSuite,
}

impl LoginCase {
    fn accepted(name: &'static str, login: LoginRequest) -> Self {
        let suite = TestSuite::new(name)
            .with_assertion(Assertion::json_equals("$.success", json!(true)))
            .with_assertion(Assertion::json_exists("$.data.token"));
        Self {
            name,
            payload: Payload::Credentials(login),
            suite,
        }
    }

    fn refused(name: &'static str, payload: Payload, message: &str) -> Self {
        let suite = TestSuite::new(name)
            .with_assertion(Assertion::json_equals("$.success", json!(false)))
            .with_assertion(Assertion::body_contains(message));
        Self {
            name,
            payload,
            suite,
        }
    }

    fn echoing(mut self, identity: &TestIdentity) -> Self {
        self.suite = self
            .suite
            .with_assertion(Assertion::json_equals("$.data.username", json!(identity.username)))
            .with_assertion(Assertion::json_equals("$.data.email", json!(identity.email)));
        self
    }
}

/// Exercises `POST /login` with good and bad credentials and bad bodies.
///
/// Login results are judged by the envelope rather than the status code,
/// since the server reports failed logins with a 400 and a JSON body.
pub struct LoginChecks<C: HttpClient, R: Reporter> {
    client: Arc<C>,
    reporter: Arc<R>,
    target: ApiTarget,
}

impl<C: HttpClient, R: Reporter> LoginChecks<C, R> {
    /// Creates a new `LoginChecks` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, reporter: Arc<R>, target: ApiTarget) -> Self {
        Self {
            client,
            reporter,
            target,
        }
    }

    /// Runs the seven login checks in order.
    ///
    /// # Errors
    ///
    /// Returns `Transport` as soon as one request gets no response.
    pub async fn execute(&self, identity: &TestIdentity) -> ApplicationResult<Vec<TestResults>> {
        let cases = Self::cases(identity);

        let mut all = Vec::with_capacity(cases.len());
        for case in cases {
            self.reporter.step(&format!("Testing {}...", case.name));

            let request = self.request(&case.payload)?;
            tracing::debug!(request_id = %request.id, check = case.name, "sending login");
            let response = self.client.execute(&request).await?;
            self.reporter.response("Login response", &response);

            let results = case.suite.run(&response);
            log_results(&results);
            all.push(results);
        }
        Ok(all)
    }

    fn cases(identity: &TestIdentity) -> [LoginCase; 7] {
        let password = identity.password.as_str();
        [
            LoginCase::accepted(
                "login with username",
                LoginRequest::new(&identity.username, password),
            )
            .echoing(identity),
            LoginCase::accepted("login with email", LoginRequest::new(&identity.email, password)),
            LoginCase::refused(
                "login with wrong password",
                Payload::Credentials(LoginRequest::new(&identity.username, WRONG_PASSWORD)),
                BAD_CREDENTIALS_MESSAGE,
            ),
            LoginCase::refused(
                "login with unknown user",
                Payload::Credentials(LoginRequest::new(UNKNOWN_USERNAME, password)),
                BAD_CREDENTIALS_MESSAGE,
            ),
            LoginCase::refused(
                "login with unknown email",
                Payload::Credentials(LoginRequest::new(UNKNOWN_EMAIL, password)),
                BAD_CREDENTIALS_MESSAGE,
            ),
            LoginCase::refused("login with empty body", Payload::Raw(""), EMPTY_BODY_MESSAGE),
            LoginCase::refused(
                "login with malformed json",
                Payload::Raw(MALFORMED_BODY),
                MALFORMED_BODY_MESSAGE,
            ),
        ]
    }

    fn request(&self, payload: &Payload) -> ApplicationResult<RequestSpec> {
        Ok(match payload {
            Payload::Credentials(login) => self.target.login(login)?,
            Payload::Raw(content) => self.target.login_raw(content),
        })
    }
}
