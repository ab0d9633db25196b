//! Response verifier.
//!
//! Evaluates a scenario's checklist against the observed response, with
//! expectations resolved from the request that produced it.

use echocheck_domain::request::RequestSpec;
use echocheck_domain::response::ResponseRecord;
use echocheck_domain::testing::{
    Assertion, AssertionResult, Check, Expected, ScenarioOutcome, ValueSource,
};
use serde_json::{Number, Value};

/// Outcome of verifying one checklist.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Results of the assertions that were evaluated, in order.
    pub results: Vec<AssertionResult>,
    /// Assertions left unevaluated after a hard failure.
    pub skipped: usize,
}

impl Verification {
    /// Overall outcome of the evaluated assertions.
    #[must_use]
    pub fn outcome(&self) -> ScenarioOutcome {
        ScenarioOutcome::from_results(&self.results)
    }
}

/// Verifier that evaluates assertions against responses.
#[derive(Debug, Clone, Copy)]
pub struct ResponseVerifier {
    stop_on_failure: bool,
}

impl Default for ResponseVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseVerifier {
    /// Create a verifier that stops at the first hard failure.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: true,
        }
    }

    /// Set whether a failing hard assertion stops the remaining checks.
    /// Soft failures never stop evaluation.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Evaluate a checklist.
    #[must_use]
    pub fn verify(
        &self,
        assertions: &[Assertion],
        request: &RequestSpec,
        response: &ResponseRecord,
    ) -> Verification {
        let mut results = Vec::with_capacity(assertions.len());

        for (index, assertion) in assertions.iter().enumerate() {
            let result = self.check(assertion, request, response);
            let stop = self.stop_on_failure && result.is_hard_failure();
            results.push(result);

            if stop {
                return Verification {
                    results,
                    skipped: assertions.len() - index - 1,
                };
            }
        }

        Verification {
            results,
            skipped: 0,
        }
    }

    /// Evaluate a single assertion.
    #[must_use]
    pub fn check(
        &self,
        assertion: &Assertion,
        request: &RequestSpec,
        response: &ResponseRecord,
    ) -> AssertionResult {
        let actual = assertion.source.extract(response, request);

        match &assertion.check {
            Check::Equals { expected } => Self::check_equals(assertion, actual, expected, request),
            Check::DeepEquals { expected } => {
                Self::check_deep_equals(assertion, actual, expected, request)
            }
            Check::HasProperty { key, ignore_case } => {
                Self::check_has_property(assertion, actual, key, *ignore_case)
            }
            Check::LessThan { bound } => Self::check_less_than(assertion, actual, *bound),
        }
    }

    fn check_equals(
        assertion: &Assertion,
        actual: Option<Value>,
        expected: &Expected,
        request: &RequestSpec,
    ) -> AssertionResult {
        let label = assertion.source.label();
        let Some(expected) = expected.resolve(request) else {
            return AssertionResult::fail(assertion, missing_expectation(expected));
        };
        let Some(actual) = actual else {
            return AssertionResult::fail(assertion, format!("{label} not found"));
        };

        if !is_scalar(&actual) {
            return AssertionResult::fail_with_value(
                assertion,
                actual.to_string(),
                format!("Expected {label} to be a scalar value, got {actual}"),
            );
        }

        if json_equal(&actual, &expected) {
            AssertionResult::pass(assertion, actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion,
                actual.to_string(),
                format!("Expected {label} to strictly equal {expected}, got {actual}"),
            )
        }
    }

    fn check_deep_equals(
        assertion: &Assertion,
        actual: Option<Value>,
        expected: &Expected,
        request: &RequestSpec,
    ) -> AssertionResult {
        let label = assertion.source.label();
        let Some(expected) = expected.resolve(request) else {
            return AssertionResult::fail(assertion, missing_expectation(expected));
        };
        let Some(actual) = actual else {
            return AssertionResult::fail(assertion, format!("{label} not found"));
        };

        if json_equal(&actual, &expected) {
            AssertionResult::pass(assertion, actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion,
                actual.to_string(),
                format!("Expected {label} to deeply equal {expected}, got {actual}"),
            )
        }
    }

    fn check_has_property(
        assertion: &Assertion,
        actual: Option<Value>,
        key: &str,
        ignore_case: bool,
    ) -> AssertionResult {
        let label = assertion.source.label();
        let Some(actual) = actual else {
            return AssertionResult::fail(assertion, format!("{label} not found"));
        };
        let Some(object) = actual.as_object() else {
            return AssertionResult::fail_with_value(
                assertion,
                actual.to_string(),
                format!("Expected {label} to be an object with property '{key}'"),
            );
        };

        let found = if ignore_case {
            object.keys().find(|k| k.eq_ignore_ascii_case(key))
        } else {
            object.keys().find(|k| k.as_str() == key)
        };

        match found {
            Some(name) => AssertionResult::pass(assertion, name.clone()),
            None => {
                let keys: Vec<&str> = object.keys().map(String::as_str).collect();
                AssertionResult::fail_with_value(
                    assertion,
                    format!("[{}]", keys.join(", ")),
                    format!("Expected {label} to have property '{key}'"),
                )
            }
        }
    }

    fn check_less_than(
        assertion: &Assertion,
        actual: Option<Value>,
        bound: f64,
    ) -> AssertionResult {
        let label = assertion.source.label();
        let Some(actual) = actual else {
            return AssertionResult::fail(assertion, format!("{label} not found"));
        };
        let Some(number) = actual.as_f64() else {
            return AssertionResult::fail_with_value(
                assertion,
                actual.to_string(),
                format!("Expected {label} to be a number"),
            );
        };

        let display = if assertion.source == ValueSource::DurationMs {
            format!("{number:.0}ms")
        } else {
            actual.to_string()
        };

        if number < bound {
            AssertionResult::pass(assertion, display)
        } else {
            AssertionResult::fail_with_value(
                assertion,
                display.clone(),
                format!("Expected {label} {display} to be below {bound}"),
            )
        }
    }
}

const fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// JSON equality with a single number type: `1` equals `1.0`.
fn json_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_equal(x, y)))
        }
        _ => left == right,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn missing_expectation(expected: &Expected) -> String {
    match expected {
        Expected::RequestQuery(key) => format!("Request has no query parameter '{key}'"),
        Expected::RequestHeader(name) => format!("Request has no header '{name}'"),
        Expected::Value(_) | Expected::RequestBody => "Expected value is unavailable".to_string(),
    }
}
