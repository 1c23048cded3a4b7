//! Smoke Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, clock, reporter)
//! - The endpoint table of the API under test
//! - The individual checks and the run orchestration
//! - Application-level error handling

pub mod endpoints;
pub mod error;
pub mod ports;
pub mod runner;
pub mod use_cases;

pub use endpoints::ApiTarget;
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, HttpClient, HttpClientError, Reporter};
pub use runner::{RunOptions, RunReport, SmokeRunner};
pub use use_cases::{GetProfile, LoginChecks, RegisterUser};

#[cfg(test)]
mod test_support;
