//! Reporter port
//!
//! The runner's human-facing transcript. Every response is echoed with its
//! status code and raw body so an operator can inspect what the server said.

use smoke_domain::response::ResponseSpec;

/// Port for the console transcript of a run.
pub trait Reporter: Send + Sync {
    /// Announces the start of a step.
    fn step(&self, title: &str);

    /// Echoes a response: `label: status` followed by the raw body.
    fn response(&self, label: &str, response: &ResponseSpec);

    /// Prints an informational notice.
    fn notice(&self, message: &str);
}
