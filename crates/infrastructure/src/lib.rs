//! Smoke Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod reporting;
pub mod settings;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use reporting::ConsoleReporter;
pub use settings::{ConfigError, SmokeConfig};
