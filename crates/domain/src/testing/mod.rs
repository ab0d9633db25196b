//! Response testing and assertions.
//!
//! This module provides types for declaring checks on HTTP responses and
//! for reporting their results.

mod assertion;
mod report;
mod scenario;

pub use assertion::{Assertion, AssertionResult, Check, ComparisonKind, Expected, ValueSource};
pub use report::{ScenarioError, ScenarioOutcome, ScenarioReport, SuiteReport};
pub use scenario::Scenario;
