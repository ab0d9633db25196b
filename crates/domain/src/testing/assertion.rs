//! Declarative assertions over an observed response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::RequestSpec;
use crate::response::ResponseRecord;

/// Where the actual value of an assertion is read from.
///
/// Every variant is a pure accessor over the response and the request that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "name", rename_all = "snake_case")]
pub enum ValueSource {
    /// The HTTP status code.
    Status,
    /// The round-trip time in milliseconds.
    DurationMs,
    /// The whole response body.
    Body,
    /// A top-level field of the response body.
    Field(String),
    /// A header as reported in the echoed `headers` map, matched
    /// case-insensitively.
    EchoedHeader(String),
    /// A query parameter as reported in the echoed `args` map.
    EchoedArg(String),
}

impl ValueSource {
    /// Reads the actual value from a response.
    ///
    /// Returns `None` when the value is absent (missing field, body that is
    /// not an object, ...).
    #[must_use]
    pub fn extract(&self, response: &ResponseRecord, _request: &RequestSpec) -> Option<Value> {
        match self {
            Self::Status => Some(Value::from(response.status)),
            Self::DurationMs => Some(Value::from(response.duration_ms())),
            Self::Body => Some(response.body.clone()),
            Self::Field(name) => response.field(name).cloned(),
            Self::EchoedHeader(name) => response
                .field("headers")
                .and_then(Value::as_object)
                .and_then(|headers| {
                    headers
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(name))
                        .map(|(_, value)| value.clone())
                }),
            Self::EchoedArg(name) => response
                .field("args")
                .and_then(Value::as_object)
                .and_then(|args| args.get(name))
                .cloned(),
        }
    }

    /// Short label used in failure messages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Status => "status".to_string(),
            Self::DurationMs => "duration".to_string(),
            Self::Body => "body".to_string(),
            Self::Field(name) => format!("body.{name}"),
            Self::EchoedHeader(name) => format!("body.headers[{name}]"),
            Self::EchoedArg(name) => format!("body.args.{name}"),
        }
    }
}

/// The value an assertion compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", content = "value", rename_all = "snake_case")]
pub enum Expected {
    /// A literal JSON value.
    Value(Value),
    /// The body that was sent (`null` when the request had none).
    RequestBody,
    /// The wire string of a query parameter that was sent.
    RequestQuery(String),
    /// The value of a header that was sent.
    RequestHeader(String),
}

impl Expected {
    /// Resolves the expected value against the request that was sent.
    ///
    /// Returns `None` when the request does not carry the referenced
    /// query parameter or header.
    #[must_use]
    pub fn resolve(&self, request: &RequestSpec) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value.clone()),
            Self::RequestBody => Some(request.body().cloned().unwrap_or(Value::Null)),
            Self::RequestQuery(key) => request
                .query()
                .get(key)
                .map(|value| Value::String(value.to_wire_string())),
            Self::RequestHeader(name) => request
                .headers()
                .get(name)
                .map(|value| Value::String(value.to_string())),
        }
    }
}

impl From<Value> for Expected {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Comparison rule applied to the extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Strict equality of scalar values (no type coercion).
    Equals {
        /// Expected value.
        expected: Expected,
    },
    /// Structural equality of arbitrary JSON values.
    DeepEquals {
        /// Expected value.
        expected: Expected,
    },
    /// The value is an object with the given key.
    HasProperty {
        /// Property name.
        key: String,
        /// Match the key case-insensitively (header names).
        #[serde(default)]
        ignore_case: bool,
    },
    /// The value is a number strictly below the bound.
    LessThan {
        /// Exclusive upper bound.
        bound: f64,
    },
}

impl Check {
    /// Returns the comparison kind of this check.
    #[must_use]
    pub const fn kind(&self) -> ComparisonKind {
        match self {
            Self::Equals { .. } => ComparisonKind::Equals,
            Self::DeepEquals { .. } => ComparisonKind::DeepEquals,
            Self::HasProperty { .. } => ComparisonKind::HasProperty,
            Self::LessThan { .. } => ComparisonKind::LessThan,
        }
    }
}

/// Kinds of comparison an assertion can perform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// Strict scalar equality.
    Equals,
    /// Structural equality.
    DeepEquals,
    /// Property presence.
    HasProperty,
    /// Strict upper bound.
    LessThan,
}

/// A single declarative check against a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    /// Human-readable description, reported with the result.
    pub description: String,
    /// Where the actual value comes from.
    pub source: ValueSource,
    /// How the actual value is compared.
    pub check: Check,
    /// Soft assertions depend on the environment (network timing); their
    /// failure marks the scenario flaky and never stops evaluation.
    #[serde(default)]
    pub soft: bool,
}

impl Assertion {
    /// Creates a hard assertion.
    #[must_use]
    pub fn new(description: impl Into<String>, source: ValueSource, check: Check) -> Self {
        Self {
            description: description.into(),
            source,
            check,
            soft: false,
        }
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks this assertion as soft.
    #[must_use]
    pub const fn soft(mut self) -> Self {
        self.soft = true;
        self
    }

    /// Returns the comparison kind.
    #[must_use]
    pub const fn kind(&self) -> ComparisonKind {
        self.check.kind()
    }

    /// Status equals the given code.
    #[must_use]
    pub fn status_equals(code: u16) -> Self {
        Self::new(
            format!("Response status should be {code}"),
            ValueSource::Status,
            Check::Equals {
                expected: Expected::Value(Value::from(code)),
            },
        )
    }

    /// Round-trip time is strictly below `max_ms`. Always soft.
    #[must_use]
    pub fn duration_below(max_ms: u64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let bound = max_ms as f64;
        Self::new(
            format!("Response time should be less than {max_ms}ms"),
            ValueSource::DurationMs,
            Check::LessThan { bound },
        )
        .soft()
    }

    /// The body field `field` deep-equals the body that was sent.
    #[must_use]
    pub fn body_echo(field: impl Into<String>) -> Self {
        Self::new(
            "Response body should match request body",
            ValueSource::Field(field.into()),
            Check::DeepEquals {
                expected: Expected::RequestBody,
            },
        )
    }

    /// The echoed header map contains `name`.
    #[must_use]
    pub fn header_present(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            format!("Response should contain '{name}'"),
            ValueSource::Field("headers".to_string()),
            Check::HasProperty {
                key: name,
                ignore_case: true,
            },
        )
    }

    /// The echoed header `name` strictly equals `value`.
    #[must_use]
    pub fn header_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        Self::new(
            format!("{name} should have the value '{value}'"),
            ValueSource::EchoedHeader(name),
            Check::Equals {
                expected: Expected::Value(Value::String(value)),
            },
        )
    }

    /// The echoed `args` map contains `name`.
    #[must_use]
    pub fn arg_present(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            format!("Response should have \"{name}\" query parameter"),
            ValueSource::Field("args".to_string()),
            Check::HasProperty {
                key: name,
                ignore_case: false,
            },
        )
    }

    /// The echoed query parameter `name` strictly equals `value`.
    #[must_use]
    pub fn arg_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        Self::new(
            format!("{name} parameter should be \"{value}\""),
            ValueSource::EchoedArg(name),
            Check::Equals {
                expected: Expected::Value(Value::String(value)),
            },
        )
    }

    /// The echoed query parameter `name` equals the wire string that was sent.
    #[must_use]
    pub fn arg_matches_request(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            format!("{name} parameter value should match"),
            ValueSource::EchoedArg(name.clone()),
            Check::Equals {
                expected: Expected::RequestQuery(name),
            },
        )
    }

    /// The body has a top-level field `name`, whatever its value.
    #[must_use]
    pub fn field_present(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            format!("Response should contain the {name}"),
            ValueSource::Body,
            Check::HasProperty {
                key: name,
                ignore_case: false,
            },
        )
    }

    /// The top-level field `name` strictly equals `value`.
    #[must_use]
    pub fn field_equals(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        Self::new(
            format!("{name} in response should match"),
            ValueSource::Field(name),
            Check::Equals {
                expected: Expected::Value(value.into()),
            },
        )
    }
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    /// Description of the assertion that was run.
    pub description: String,
    /// Comparison that was performed.
    pub kind: ComparisonKind,
    /// Whether the assertion was soft.
    pub soft: bool,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result with the actual value.
    #[must_use]
    pub fn pass(assertion: &Assertion, actual: impl Into<String>) -> Self {
        Self {
            description: assertion.description.clone(),
            kind: assertion.kind(),
            soft: assertion.soft,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result without an actual value.
    #[must_use]
    pub fn fail(assertion: &Assertion, error: impl Into<String>) -> Self {
        Self {
            description: assertion.description.clone(),
            kind: assertion.kind(),
            soft: assertion.soft,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with the actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: &Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::fail(assertion, error)
        }
    }

    /// True if this is a failed hard assertion.
    #[must_use]
    pub const fn is_hard_failure(&self) -> bool {
        !self.passed && !self.soft
    }

    /// True if this is a failed soft assertion.
    #[must_use]
    pub const fn is_soft_failure(&self) -> bool {
        !self.passed && self.soft
    }
}
