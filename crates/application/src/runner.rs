//! Smoke run orchestration.
//!
//! A run is a fixed sequence: register a fresh account, fetch its profile,
//! fetch the profile anonymously, and optionally exercise login. The only
//! branch is which user id the profile check uses.

use std::sync::Arc;

use smoke_domain::{Assertion, RegisterOutcome, TestIdentity, TestResults, UserId};

use crate::endpoints::ApiTarget;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Clock, HttpClient, Reporter};
use crate::use_cases::{GetProfile, LoginChecks, RegisterUser};

/// Optional parts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Exercise `POST /login` after the profile checks.
    pub login_checks: bool,
}

/// Everything a finished run observed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Account the run tried to register.
    pub identity: TestIdentity,
    /// How registration went.
    pub registration: RegisterOutcome,
    /// Id the profile check was sent with.
    pub profile_user_id: UserId,
    /// Authenticated profile check.
    pub profile: TestResults,
    /// Anonymous profile check.
    pub unauthenticated: TestResults,
    /// Login checks; empty when disabled or skipped.
    pub login: Vec<TestResults>,
}

impl RunReport {
    /// True iff the profile request answered 200.
    #[must_use]
    pub const fn profile_passed(&self) -> bool {
        self.profile.all_passed()
    }

    /// True iff the anonymous profile request answered 401.
    #[must_use]
    pub const fn unauthenticated_rejected(&self) -> bool {
        self.unauthenticated.all_passed()
    }

    /// All checks in execution order.
    pub fn checks(&self) -> impl Iterator<Item = &TestResults> {
        [&self.profile, &self.unauthenticated]
            .into_iter()
            .chain(self.login.iter())
    }

    /// True when every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks().all(TestResults::all_passed)
    }

    /// Turns the first failed check into an error.
    ///
    /// # Errors
    ///
    /// `StatusMismatch` when the check failed on its status code,
    /// `CheckFailed` otherwise.
    pub fn ensure_passed(&self) -> ApplicationResult<()> {
        for check in self.checks() {
            let Some(failure) = check.failures().next() else {
                continue;
            };
            return Err(match &failure.assertion {
                Assertion::StatusCode { expected } => ApplicationError::StatusMismatch {
                    check: check.suite_name.clone(),
                    expected: *expected,
                    actual: check.status,
                },
                other => ApplicationError::CheckFailed {
                    check: check.suite_name.clone(),
                    reason: failure
                        .error
                        .clone()
                        .unwrap_or_else(|| other.description()),
                },
            });
        }
        Ok(())
    }
}

/// Drives one smoke run against an [`ApiTarget`].
pub struct SmokeRunner<C: HttpClient, K: Clock, R: Reporter> {
    register: RegisterUser<C, R>,
    profile: GetProfile<C, R>,
    login: LoginChecks<C, R>,
    clock: Arc<K>,
    reporter: Arc<R>,
    options: RunOptions,
}

impl<C: HttpClient, K: Clock, R: Reporter> SmokeRunner<C, K, R> {
    /// Wires the use cases of a run around shared adapters.
    #[must_use]
    pub fn new(
        client: Arc<C>,
        clock: Arc<K>,
        reporter: Arc<R>,
        target: &ApiTarget,
        options: RunOptions,
    ) -> Self {
        Self {
            register: RegisterUser::new(client.clone(), reporter.clone(), target.clone()),
            profile: GetProfile::new(client.clone(), reporter.clone(), target.clone()),
            login: LoginChecks::new(client, reporter.clone(), target.clone()),
            clock,
            reporter,
            options,
        }
    }

    /// Performs the run.
    ///
    /// Requests are sent one at a time; each is awaited before the next
    /// is built.
    ///
    /// # Errors
    ///
    /// Stops at the first `Transport` or `Decode` error; no later request
    /// is sent. Failed checks are not errors, see [`RunReport::ensure_passed`].
    pub async fn run(&self) -> ApplicationResult<RunReport> {
        let identity = TestIdentity::at(self.clock.now());
        tracing::info!(username = %identity.username, "starting smoke run");

        let registration = self.register.execute(&identity).await?;

        let profile_user_id = match registration.user_id() {
            Some(id) => id,
            None => {
                self.reporter.notice(&format!(
                    "Registration failed, testing with default user id {}",
                    UserId::FALLBACK
                ));
                UserId::FALLBACK
            }
        };

        let profile = self.profile.execute(&profile_user_id).await?;
        let unauthenticated = self.profile.execute_unauthenticated().await?;

        let login = if !self.options.login_checks {
            Vec::new()
        } else if registration.is_registered() {
            self.login.execute(&identity).await?
        } else {
            tracing::warn!("skipping login checks, registration did not succeed");
            Vec::new()
        };

        let report = RunReport {
            identity,
            registration,
            profile_user_id,
            profile,
            unauthenticated,
            login,
        };
        tracing::info!(
            profile_passed = report.profile_passed(),
            unauthenticated_rejected = report.unauthenticated_rejected(),
            login_checks = report.login.len(),
            "smoke run finished"
        );
        Ok(report)
    }
}
