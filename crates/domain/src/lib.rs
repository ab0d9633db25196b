//! Echocheck Domain - Core types
//!
//! This crate defines the request, response and assertion model of the
//! echocheck HTTP contract harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use request::{
    Header, Headers, HttpMethod, QueryParam, QueryParams, QueryValue, RequestBuilder, RequestSpec,
};
pub use response::{ResponseRecord, StatusCode};
pub use testing::{
    Assertion, AssertionResult, Check, ComparisonKind, Expected, Scenario, ScenarioError,
    ScenarioOutcome, ScenarioReport, SuiteReport, ValueSource,
};
