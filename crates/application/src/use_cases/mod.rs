//! Application use cases: one per check the runner performs.

mod get_profile;
mod login_checks;
mod register_user;

pub use get_profile::{GetProfile, PROFILE_CHECK, PROFILE_WITHOUT_USER_CHECK};
pub use login_checks::{
    BAD_CREDENTIALS_MESSAGE, EMPTY_BODY_MESSAGE, LoginChecks, MALFORMED_BODY_MESSAGE, UNKNOWN_EMAIL,
    UNKNOWN_USERNAME, WRONG_PASSWORD,
};
pub use register_user::RegisterUser;

use smoke_domain::TestResults;

/// Logs the verdict of a finished check.
fn log_results(results: &TestResults) {
    if results.all_passed() {
        tracing::info!(check = %results.suite_name, status = results.status, "check passed");
        return;
    }
    for failure in results.failures() {
        tracing::warn!(
            check = %results.suite_name,
            status = results.status,
            assertion = %failure.assertion.description(),
            actual = failure.actual.as_deref().unwrap_or_default(),
            error = failure.error.as_deref().unwrap_or_default(),
            "check failed"
        );
    }
}
