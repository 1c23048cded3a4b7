//! Response checks and assertions.
//!
//! A check is a named [`TestSuite`] of [`Assertion`]s evaluated against one
//! response. Evaluation is pure; sending the request is the caller's job.

use serde_json::Value;

use crate::response::ResponseSpec;

/// A single assertion to run against a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// Status code must equal `expected`.
    StatusCode {
        /// Expected status code.
        expected: u16,
    },
    /// A JSON path must exist, and equal `expected` when given.
    JsonPath {
        /// Path expression (e.g., "$.data.token").
        path: String,
        /// Expected value.
        expected: Option<Value>,
    },
    /// The raw body must contain `text`.
    BodyContains {
        /// Text to search for.
        text: String,
    },
}

impl Assertion {
    /// Status must equal `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode { expected: code }
    }

    /// JSON value at `path` must equal `expected`.
    #[must_use]
    pub fn json_equals(path: impl Into<String>, expected: Value) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(expected),
        }
    }

    /// JSON value at `path` must exist.
    #[must_use]
    pub fn json_exists(path: impl Into<String>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: None,
        }
    }

    /// Raw body must contain `text`.
    #[must_use]
    pub fn body_contains(text: impl Into<String>) -> Self {
        Self::BodyContains { text: text.into() }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {expected}"),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::BodyContains { text } => format!("Body contains '{text}'"),
        }
    }

    /// Evaluates this assertion against `response`.
    #[must_use]
    pub fn evaluate(&self, response: &ResponseSpec) -> AssertionResult {
        match self {
            Self::StatusCode { expected } => {
                let actual = response.status;
                if actual == *expected {
                    AssertionResult::pass(self.clone(), actual.to_string())
                } else {
                    AssertionResult::fail(
                        self.clone(),
                        Some(actual.to_string()),
                        format!("Expected status {expected}, got {actual}"),
                    )
                }
            }
            Self::JsonPath { path, expected } => {
                self.check_json_path(response, path, expected.as_ref())
            }
            Self::BodyContains { text } => {
                if response.body.contains(text.as_str()) {
                    AssertionResult::pass(self.clone(), text.clone())
                } else {
                    AssertionResult::fail(
                        self.clone(),
                        None,
                        format!("Body does not contain '{text}'"),
                    )
                }
            }
        }
    }

    fn check_json_path(
        &self,
        response: &ResponseSpec,
        path: &str,
        expected: Option<&Value>,
    ) -> AssertionResult {
        let json = match serde_json::from_str::<Value>(&response.body) {
            Ok(json) => json,
            Err(e) => {
                return AssertionResult::fail(
                    self.clone(),
                    None,
                    format!("Failed to parse body as JSON: {e}"),
                );
            }
        };

        match query_json_path(&json, path) {
            Ok(Some(value)) => match expected {
                Some(want) if value != want => AssertionResult::fail(
                    self.clone(),
                    Some(value.to_string()),
                    format!("JSON path '{path}' value mismatch: expected {want}, got {value}"),
                ),
                _ => AssertionResult::pass(self.clone(), value.to_string()),
            },
            Ok(None) => {
                AssertionResult::fail(self.clone(), None, format!("JSON path '{path}' not found"))
            }
            Err(e) => AssertionResult::fail(
                self.clone(),
                None,
                format!("Invalid JSON path '{path}': {e}"),
            ),
        }
    }
}

/// Resolves a `$.a.b[0]` style path.
fn query_json_path<'a>(json: &'a Value, path: &str) -> Result<Option<&'a Value>, String> {
    let Some(rest) = path.trim().strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    if rest.is_empty() {
        return Ok(Some(json));
    }

    let mut current = json;
    for segment in rest.split('.') {
        let (name, index) = match segment.split_once('[') {
            Some((name, tail)) => {
                let raw = tail
                    .strip_suffix(']')
                    .ok_or_else(|| format!("Unclosed bracket in '{segment}'"))?;
                let idx: usize = raw
                    .parse()
                    .map_err(|_| format!("Invalid array index: {raw}"))?;
                (name, Some(idx))
            }
            None => (segment, None),
        };

        if !name.is_empty() {
            match current.get(name) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
        if let Some(idx) = index {
            match current.get(idx) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
    }

    Ok(Some(current))
}

/// Result of running a single assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found, when there was one to find.
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// A passed result with the value that satisfied it.
    #[must_use]
    pub fn pass(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// A failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, actual: Option<String>, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual,
            error: Some(error.into()),
        }
    }
}

/// A named group of assertions applied to one response.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuite {
    /// Check name.
    pub name: String,
    /// Assertions to run.
    pub assertions: Vec<Assertion>,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
        }
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Runs every assertion against `response`.
    #[must_use]
    pub fn run(&self, response: &ResponseSpec) -> TestResults {
        let results = self
            .assertions
            .iter()
            .map(|assertion| assertion.evaluate(response))
            .collect();
        TestResults::new(&self.name, response.status, results)
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Status of the response the suite ran against.
    pub status: u16,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Number of failed assertions.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(suite_name: impl Into<String>, status: u16, results: Vec<AssertionResult>) -> Self {
        let failed = results.iter().filter(|r| !r.passed).count();
        Self {
            suite_name: suite_name.into(),
            status,
            results,
            failed,
        }
    }

    /// Check if all assertions passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Failed assertion results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}
