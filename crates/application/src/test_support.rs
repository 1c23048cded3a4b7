//! Test doubles shared by the use case and runner tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use smoke_domain::request::RequestSpec;
use smoke_domain::response::ResponseSpec;

use crate::ports::{Clock, HttpClient, HttpClientError, HttpFuture, Reporter};

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<Result<ResponseSpec, HttpClientError>>>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        let response = ResponseSpec::new(
            status,
            Some("application/json".to_string()),
            body.as_bytes(),
            Duration::from_millis(5),
        );
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: HttpClientError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockHttpClient {
    fn execute(&self, request: &RequestSpec) -> HttpFuture<'_> {
        self.requests.lock().unwrap().push(request.clone());
        let result = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpClientError::Other("no response queued".to_string())));
        Box::pin(async move { result })
    }
}

/// Collects the transcript as plain lines.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn step(&self, title: &str) {
        self.lines.lock().unwrap().push(format!("step: {title}"));
    }

    fn response(&self, label: &str, response: &ResponseSpec) {
        let mut lines = self.lines.lock().unwrap();
        lines.push(format!("{label}: {}", response.status));
        lines.push(format!("body: {}", response.body));
    }

    fn notice(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("notice: {message}"));
    }
}

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
