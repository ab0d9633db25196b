//! Scenario and suite reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AssertionResult;
use crate::request::HttpMethod;

/// Overall outcome of a scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Every assertion passed.
    Passed,
    /// Every hard assertion passed but a soft one failed.
    Flaky,
    /// A hard assertion failed.
    Failed,
}

impl ScenarioOutcome {
    /// Derives the outcome from assertion results.
    #[must_use]
    pub fn from_results(results: &[AssertionResult]) -> Self {
        if results.iter().any(AssertionResult::is_hard_failure) {
            Self::Failed
        } else if results.iter().any(AssertionResult::is_soft_failure) {
            Self::Flaky
        } else {
            Self::Passed
        }
    }

    /// Returns a short label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Flaky => "FLAKY",
            Self::Failed => "FAIL",
        }
    }
}

/// Report for one executed scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub scenario: String,
    /// Method that was sent.
    pub method: HttpMethod,
    /// URL that was sent, including the query string.
    pub url: String,
    /// Observed status code.
    pub status: u16,
    /// Observed round-trip time in milliseconds.
    pub duration_ms: u64,
    /// When the request was dispatched.
    pub started_at: DateTime<Utc>,
    /// Results in checklist order.
    pub results: Vec<AssertionResult>,
    /// Number of assertions not evaluated after a hard failure.
    pub skipped: usize,
    /// Overall outcome.
    pub outcome: ScenarioOutcome,
}

impl ScenarioReport {
    /// Returns the first failed hard assertion, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&AssertionResult> {
        self.results.iter().find(|r| r.is_hard_failure())
    }

    /// Returns the failed soft assertions.
    pub fn soft_failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| r.is_soft_failure())
    }
}

/// A scenario that could not be verified because the transport failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioError {
    /// Scenario name.
    pub scenario: String,
    /// Transport error message.
    pub message: String,
}

/// Results from running a list of scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique identifier of the run.
    pub run_id: Uuid,
    /// Reports of the scenarios that received a response.
    pub scenarios: Vec<ScenarioReport>,
    /// Scenarios aborted by a transport failure.
    pub errors: Vec<ScenarioError>,
    /// Number of scenarios attempted.
    pub total: usize,
    /// Scenarios where every assertion passed.
    pub passed: usize,
    /// Scenarios with only soft failures.
    pub flaky: usize,
    /// Scenarios with a hard failure.
    pub failed: usize,
    /// Scenarios aborted by the transport.
    pub errored: usize,
}

impl SuiteReport {
    /// Builds a suite report and computes the counters.
    #[must_use]
    pub fn new(scenarios: Vec<ScenarioReport>, errors: Vec<ScenarioError>) -> Self {
        let count = |outcome: ScenarioOutcome| {
            scenarios.iter().filter(|s| s.outcome == outcome).count()
        };
        let passed = count(ScenarioOutcome::Passed);
        let flaky = count(ScenarioOutcome::Flaky);
        let failed = count(ScenarioOutcome::Failed);
        let errored = errors.len();

        Self {
            run_id: Uuid::now_v7(),
            total: scenarios.len() + errored,
            scenarios,
            errors,
            passed,
            flaky,
            failed,
            errored,
        }
    }

    /// True when no scenario failed or errored. Flaky scenarios do not count
    /// as failures.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Get pass rate as percentage, counting flaky scenarios as passed.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let rate = ((self.passed + self.flaky) as f64 / self.total as f64) * 100.0;
            rate
        }
    }

    /// Finds a scenario report by name.
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.scenario == name)
    }
}
