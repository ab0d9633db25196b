//! Scenario: one request plus the checklist run against its response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Assertion;
use crate::request::RequestSpec;

/// One independent test case: a request and the assertions on its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    request: RequestSpec,
    #[serde(default)]
    assertions: Vec<Assertion>,
}

impl Scenario {
    /// Creates a scenario with an empty checklist.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            name: name.into(),
            request,
            assertions: Vec::new(),
        }
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The request this scenario sends.
    #[must_use]
    pub const fn request(&self) -> &RequestSpec {
        &self.request
    }

    /// The checklist, in evaluation order.
    #[must_use]
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Expect the given status code.
    #[must_use]
    pub fn expect_status(self, code: u16) -> Self {
        self.with_assertion(Assertion::status_equals(code))
    }

    /// Expect the round trip to finish in under `max_ms` (soft).
    #[must_use]
    pub fn expect_duration_below(self, max_ms: u64) -> Self {
        self.with_assertion(Assertion::duration_below(max_ms))
    }

    /// Expect the request body to come back unchanged under `json`.
    #[must_use]
    pub fn expect_body_echo(self) -> Self {
        self.with_assertion(Assertion::body_echo("json"))
    }

    /// Expect the echoed headers to contain `name` with exactly `value`.
    #[must_use]
    pub fn expect_header(self, name: &str, value: &str) -> Self {
        self.with_assertion(Assertion::header_present(name))
            .with_assertion(Assertion::header_equals(name, value))
    }

    /// Expect the echoed args to contain `name` with exactly `value`.
    #[must_use]
    pub fn expect_arg(self, name: &str, value: &str) -> Self {
        self.with_assertion(Assertion::arg_present(name))
            .with_assertion(Assertion::arg_equals(name, value))
    }

    /// Expect the echoed args to contain `name` with the value that was sent.
    #[must_use]
    pub fn expect_arg_echo(self, name: &str) -> Self {
        self.with_assertion(Assertion::arg_present(name))
            .with_assertion(Assertion::arg_matches_request(name))
    }

    /// Expect a top-level body field to exist.
    #[must_use]
    pub fn expect_field(self, name: &str) -> Self {
        self.with_assertion(Assertion::field_present(name))
    }

    /// Expect a top-level body field to strictly equal `value`.
    #[must_use]
    pub fn expect_field_equals(self, name: &str, value: impl Into<Value>) -> Self {
        self.with_assertion(Assertion::field_equals(name, value))
    }

    /// Check if the checklist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}
