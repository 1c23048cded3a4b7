//! End-to-end runs against a mock API server.
#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::process::{Command, Output};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use smoke_application::use_cases::{
    BAD_CREDENTIALS_MESSAGE, EMPTY_BODY_MESSAGE, MALFORMED_BODY_MESSAGE, UNKNOWN_EMAIL,
    UNKNOWN_USERNAME,
};
use smoke_application::{ApiTarget, ApplicationError, RunOptions, RunReport, SmokeRunner};
use smoke_domain::{RegisterOutcome, UserId};
use smoke_infrastructure::{ConsoleReporter, ReqwestHttpClient, SystemClock};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches login attempts with the registration password for a known user.
struct ValidLogin;

impl Match for ValidLogin {
    fn matches(&self, request: &Request) -> bool {
        request
            .body_json::<serde_json::Value>()
            .is_ok_and(|body| {
                body["password"] == "Password123"
                    && body["username"] != UNKNOWN_USERNAME
                    && body["username"] != UNKNOWN_EMAIL
            })
    }
}

/// Matches non-empty bodies that do not parse as JSON.
struct NotJson;

impl Match for NotJson {
    fn matches(&self, request: &Request) -> bool {
        !request.body.is_empty() && request.body_json::<serde_json::Value>().is_err()
    }
}

fn refusal(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({ "success": false, "message": message }))
}

/// Matches requests that carry no `X-User-ID` header.
struct NoUserId;

impl Match for NoUserId {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("x-user-id")
    }
}

fn target(server: &MockServer) -> ApiTarget {
    ApiTarget::new(&format!("{}/api/v1", server.uri())).unwrap()
}

async fn run_against(
    target: &ApiTarget,
    options: RunOptions,
) -> (Result<RunReport, ApplicationError>, String) {
    let reporter = Arc::new(ConsoleReporter::new(Vec::new()));
    let runner = SmokeRunner::new(
        Arc::new(ReqwestHttpClient::new().unwrap()),
        Arc::new(SystemClock::new()),
        reporter.clone(),
        target,
        options,
    );
    let result = runner.run().await;
    drop(runner);
    let transcript = Arc::try_unwrap(reporter)
        .ok()
        .expect("runner released the reporter")
        .into_inner();
    (result, String::from_utf8(transcript).unwrap())
}

async fn mount_register(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/v1/register"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_profile(server: &MockServer, user_id: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(header("X-User-ID", user_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "user_id": user_id }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(NoUserId)
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "missing user id"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_registered_user_profile_is_fetched() {
    let server = MockServer::start().await;
    mount_register(
        &server,
        200,
        json!({ "success": true, "data": { "user_id": 42 } }),
    )
    .await;
    mount_profile(&server, "42").await;

    let (result, transcript) = run_against(&target(&server), RunOptions::default()).await;
    let report = result.unwrap();

    assert_eq!(
        report.registration,
        RegisterOutcome::Registered { user_id: UserId::new("42") }
    );
    assert_eq!(report.profile_user_id, UserId::new("42"));
    assert!(report.profile_passed());
    assert!(report.unauthenticated_rejected());
    assert!(transcript.starts_with("Registering test user...\nRegister response: 200\n"));
    assert!(
        transcript.contains("\nTesting profile retrieval (user id: 42)...\nProfile response: 200\n")
    );
    assert!(transcript.contains("\nTesting error case (no user id)...\nProfile response: 401\n"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    let registration: serde_json::Value = requests[0].body_json().unwrap();
    let username = registration["username"].as_str().unwrap();
    assert!(username.starts_with("testuser_"));
    assert_eq!(
        registration,
        json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "Password123",
            "cpp_answer": "const",
            "question_index": 0
        })
    );
}

#[tokio::test]
async fn test_rejected_registration_falls_back_to_user_one() {
    let server = MockServer::start().await;
    mount_register(
        &server,
        409,
        json!({ "success": false, "message": "username taken" }),
    )
    .await;
    mount_profile(&server, "1").await;

    let (result, transcript) = run_against(&target(&server), RunOptions::default()).await;
    let report = result.unwrap();

    assert_eq!(report.registration, RegisterOutcome::Rejected { status: 409 });
    assert_eq!(report.profile_user_id, UserId::FALLBACK);
    assert!(report.profile_passed());
    assert!(transcript.contains("Registration failed, testing with default user id 1\n"));
}

#[tokio::test]
async fn test_success_without_user_id_assumes_user_one() {
    let server = MockServer::start().await;
    mount_register(&server, 200, json!({ "success": true, "data": {} })).await;
    mount_profile(&server, "1").await;

    let (result, transcript) = run_against(&target(&server), RunOptions::default()).await;
    let report = result.unwrap();

    assert_eq!(report.registration, RegisterOutcome::RegisteredWithoutId);
    assert_eq!(report.profile_user_id, UserId::FALLBACK);
    assert!(transcript.contains("No user id in response body, assuming user id 1\n"));
    assert!(!transcript.contains("Registration failed"));
}

#[tokio::test]
async fn test_null_user_id_is_treated_as_failed_registration() {
    let server = MockServer::start().await;
    mount_register(
        &server,
        200,
        json!({ "success": true, "data": { "user_id": null } }),
    )
    .await;
    mount_profile(&server, "1").await;

    let (result, transcript) = run_against(&target(&server), RunOptions::default()).await;
    let report = result.unwrap();

    assert_eq!(report.registration, RegisterOutcome::RegisteredWithEmptyId);
    assert_eq!(report.profile_user_id, UserId::FALLBACK);
    assert!(report.profile_passed());
    assert!(transcript.contains("Registration failed, testing with default user id 1\n"));
    assert!(!transcript.contains("No user id in response body"));
}

#[tokio::test]
async fn test_negative_user_id_is_forwarded() {
    let server = MockServer::start().await;
    mount_register(
        &server,
        200,
        json!({ "success": true, "data": { "user_id": -3 } }),
    )
    .await;
    mount_profile(&server, "-3").await;

    let (result, transcript) = run_against(&target(&server), RunOptions::default()).await;
    let report = result.unwrap();

    assert_eq!(report.profile_user_id, UserId::new("-3"));
    assert!(report.profile_passed());
    assert!(transcript.contains("Testing profile retrieval (user id: -3)..."));
}

#[tokio::test]
async fn test_array_registration_body_aborts_the_run() {
    let server = MockServer::start().await;
    mount_register(&server, 200, json!([])).await;

    let (result, _) = run_against(&target(&server), RunOptions::default()).await;

    assert!(matches!(result, Err(ApplicationError::Decode { .. })));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_server_aborts_the_run() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let target = ApiTarget::new(&format!("http://127.0.0.1:{port}/api/v1")).unwrap();

    let (result, transcript) = run_against(&target, RunOptions::default()).await;

    assert!(result.unwrap_err().is_transport());
    assert_eq!(transcript, "Registering test user...\n");
}

#[tokio::test]
async fn test_non_json_registration_body_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/register"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let (result, _) = run_against(&target(&server), RunOptions::default()).await;

    assert!(matches!(result, Err(ApplicationError::Decode { .. })));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_checks_follow_registration() {
    let server = MockServer::start().await;
    mount_register(
        &server,
        200,
        json!({ "success": true, "data": { "user_id": 7 } }),
    )
    .await;
    mount_profile(&server, "7").await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(ValidLogin)
        .respond_with(|request: &Request| {
            let login: serde_json::Value = request.body_json().unwrap();
            let name = login["username"].as_str().unwrap_or_default();
            let username = name.trim_end_matches("@example.com");
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "user_id": 7,
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "token": "abc"
                }
            }))
        })
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_string(""))
        .respond_with(refusal(EMPTY_BODY_MESSAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(NotJson)
        .respond_with(refusal(MALFORMED_BODY_MESSAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(refusal(BAD_CREDENTIALS_MESSAGE))
        .mount(&server)
        .await;

    let options = RunOptions { login_checks: true };
    let (result, transcript) = run_against(&target(&server), options).await;
    let report = result.unwrap();

    assert_eq!(report.login.len(), 7);
    assert!(report.all_passed(), "{:?}", report.ensure_passed());
    assert_eq!(transcript.matches("Login response: ").count(), 7);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 10);
    assert!(requests[8].body.is_empty());
    assert_eq!(
        requests[9].body,
        br#"{"username":"testuser","password":"password123""#
    );
}

fn run_binary(server_uri: &str, strict: bool) -> Output {
    Command::new(env!("CARGO_BIN_EXE_api-smoke"))
        .env("SMOKE_BASE_URL", format!("{server_uri}/api/v1"))
        .env("SMOKE_STRICT", strict.to_string())
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[tokio::test]
async fn test_binary_exit_status() {
    let server = MockServer::start().await;
    mount_register(
        &server,
        200,
        json!({ "success": true, "data": { "user_id": 3 } }),
    )
    .await;
    // profile answers 500 for everyone, so both checks fail
    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uri = server.uri();
    let relaxed = tokio::task::spawn_blocking({
        let uri = uri.clone();
        move || run_binary(&uri, false)
    })
    .await
    .unwrap();
    assert!(relaxed.status.success());
    let stdout = String::from_utf8(relaxed.stdout).unwrap();
    assert!(stdout.contains("Profile response: 500"));

    let strict = tokio::task::spawn_blocking(move || run_binary(&uri, true))
        .await
        .unwrap();
    assert_eq!(strict.status.code(), Some(1));
    let stderr = String::from_utf8(strict.stderr).unwrap();
    assert!(stderr.contains("get profile: expected status 200, got 500"));
}
