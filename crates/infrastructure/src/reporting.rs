//! Console transcript of a run.

use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use smoke_application::ports::Reporter;
use smoke_domain::response::ResponseSpec;

/// Writes the run transcript to any `Write` sink, stdout by default.
///
/// Steps after the first are preceded by a blank line. Responses are
/// echoed as `<label>: <status>` followed by `Response body: <body>`.
pub struct ConsoleReporter<W: Write + Send = Stdout> {
    out: Mutex<W>,
    started: AtomicBool,
}

impl ConsoleReporter<Stdout> {
    /// Reporter printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Reporter printing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            started: AtomicBool::new(false),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn emit(&self, lines: &[&str]) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(out, "{line}"))
            .and_then(|()| out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write transcript");
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn step(&self, title: &str) {
        if self.started.swap(true, Ordering::Relaxed) {
            self.emit(&["", title]);
        } else {
            self.emit(&[title]);
        }
    }

    fn response(&self, label: &str, response: &ResponseSpec) {
        let status = format!("{label}: {}", response.status);
        let body = format!("Response body: {}", response.body);
        self.emit(&[&status, &body]);
    }

    fn notice(&self, message: &str) {
        self.emit(&[message]);
    }
}
