//! Smoke Domain - Core types
//!
//! This crate defines the request/response model, the account payloads
//! exchanged with the API under test, and the assertion vocabulary used
//! to judge responses. All types here are pure Rust with no I/O.

pub mod account;
pub mod error;
pub mod request;
pub mod response;
pub mod testing;

pub use account::{
    ApiEnvelope, LoginRequest, RegisterOutcome, RegisterRequest, TestIdentity, UserId,
};
pub use error::{DomainError, DomainResult};
pub use testing::{Assertion, AssertionResult, TestResults, TestSuite};
