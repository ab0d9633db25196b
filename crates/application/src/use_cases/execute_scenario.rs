//! Execute Scenario Use Case
//!
//! Sends a scenario's request through the `HttpClient` port and verifies
//! the response against its checklist.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use echocheck_domain::testing::{
    Scenario, ScenarioError, ScenarioOutcome, ScenarioReport, SuiteReport,
};

use crate::config::HarnessConfig;
use crate::ports::{Clock, HttpClient, HttpClientError};
use crate::verifier::ResponseVerifier;

/// Error type for the execute scenario use case.
///
/// Only transport failures end up here; assertion failures are part of the
/// returned report.
#[derive(Debug, Clone, Error)]
pub enum ExecuteScenarioError {
    /// The request could not be completed.
    #[error("{0}")]
    HttpError(#[from] HttpClientError),
}

/// Use case for running scenarios.
///
/// # Example
///
/// ```ignore
/// let client = Arc::new(ReqwestHttpClient::new()?);
/// let use_case = ExecuteScenario::new(client, Arc::new(SystemClock::new()));
///
/// let report = use_case.run(&scenario).await?;
/// ```
pub struct ExecuteScenario<C: HttpClient> {
    client: Arc<C>,
    clock: Arc<dyn Clock>,
    verifier: ResponseVerifier,
}

impl<C: HttpClient> ExecuteScenario<C> {
    /// Creates the use case with the given HTTP client and clock.
    pub fn new(client: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            clock,
            verifier: ResponseVerifier::new(),
        }
    }

    /// Applies the verification policy of a configuration.
    #[must_use]
    pub fn with_config(mut self, config: &HarnessConfig) -> Self {
        self.verifier = self.verifier.with_stop_on_failure(config.stop_on_failure());
        self
    }

    /// Runs one scenario: one round trip, then the checklist.
    ///
    /// Non-2xx statuses are verified like any other response when the
    /// request does not fail on status codes.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteScenarioError` if the transport fails; the checklist
    /// is not evaluated in that case.
    pub async fn run(&self, scenario: &Scenario) -> Result<ScenarioReport, ExecuteScenarioError> {
        let request = scenario.request();
        let url = request
            .full_url()
            .map_or_else(|_| request.url().to_string(), |url| url.to_string());

        info!(
            scenario = scenario.name(),
            method = %request.method(),
            url = %url,
            "Running scenario"
        );

        let started_at = self.clock.now();
        let response = self.client.execute(request).await.inspect_err(|e| {
            error!(scenario = scenario.name(), error = %e, "Transport failure");
        })?;

        debug!(
            scenario = scenario.name(),
            status = response.status,
            duration_ms = response.duration_ms(),
            "Response received"
        );

        let verification = self.verifier.verify(scenario.assertions(), request, &response);

        for result in verification.results.iter().filter(|r| !r.passed) {
            warn!(
                scenario = scenario.name(),
                assertion = %result.description,
                soft = result.soft,
                error = result.error.as_deref().unwrap_or_default(),
                "Assertion failed"
            );
        }

        let outcome = verification.outcome();
        match outcome {
            ScenarioOutcome::Passed => info!(scenario = scenario.name(), "Scenario passed"),
            ScenarioOutcome::Flaky => warn!(
                scenario = scenario.name(),
                "Scenario passed with environment-dependent failures"
            ),
            ScenarioOutcome::Failed => warn!(
                scenario = scenario.name(),
                skipped = verification.skipped,
                "Scenario failed"
            ),
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = response.duration.as_millis() as u64;

        Ok(ScenarioReport {
            scenario: scenario.name().to_string(),
            method: request.method(),
            url,
            status: response.status,
            duration_ms,
            started_at,
            results: verification.results,
            skipped: verification.skipped,
            outcome,
        })
    }

    /// Runs scenarios one after another.
    ///
    /// A transport failure is recorded against its scenario and the run
    /// moves on to the next one.
    pub async fn run_suite(&self, scenarios: &[Scenario]) -> SuiteReport {
        let mut reports = Vec::with_capacity(scenarios.len());
        let mut errors = Vec::new();

        for scenario in scenarios {
            match self.run(scenario).await {
                Ok(report) => reports.push(report),
                Err(e) => errors.push(ScenarioError {
                    scenario: scenario.name().to_string(),
                    message: e.to_string(),
                }),
            }
        }

        let report = SuiteReport::new(reports, errors);
        info!(
            run_id = %report.run_id,
            total = report.total,
            passed = report.passed,
            flaky = report.flaky,
            failed = report.failed,
            errored = report.errored,
            "Suite finished"
        );
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use echocheck_domain::request::RequestSpec;
    use echocheck_domain::response::ResponseRecord;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock HTTP client that echoes the request like httpbin does.
    struct EchoHttpClient {
        status: u16,
        sent: Mutex<Vec<RequestSpec>>,
    }

    impl EchoHttpClient {
        fn new(status: u16) -> Self {
            Self {
                status,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for EchoHttpClient {
        async fn execute(&self, request: &RequestSpec) -> Result<ResponseRecord, HttpClientError> {
            self.sent.lock().unwrap().push(request.clone());

            if request.url().contains("offline") {
                return Err(HttpClientError::ConnectionRefused {
                    host: "offline".to_string(),
                    port: 80,
                });
            }

            let args: serde_json::Map<String, Value> = request
                .query()
                .wire_pairs()
                .map(|(k, v)| (k.to_string(), Value::String(v)))
                .collect();
            let body = json!({
                "args": args,
                "json": request.body().cloned().unwrap_or(Value::Null),
                "url": request.url(),
            });

            Ok(ResponseRecord::new(
                self.status,
                HashMap::new(),
                body,
                Duration::from_millis(20),
            ))
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn use_case(status: u16) -> (Arc<EchoHttpClient>, ExecuteScenario<EchoHttpClient>) {
        let client = Arc::new(EchoHttpClient::new(status));
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        (client.clone(), ExecuteScenario::new(client, clock))
    }

    #[tokio::test]
    async fn test_run_passing_scenario() {
        let (client, use_case) = use_case(200);
        let scenario = Scenario::new(
            "post",
            RequestSpec::post("https://httpbin.org/post")
                .json(json!({"name": "John"}))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200)
        .expect_body_echo();

        let report = use_case.run(&scenario).await.expect("should run");

        assert_eq!(report.outcome, ScenarioOutcome::Passed);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.status, 200);
        assert_eq!(report.duration_ms, 20);
        assert_eq!(report.started_at.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert_eq!(client.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_report_url_includes_query() {
        let (_, use_case) = use_case(200);
        let scenario = Scenario::new(
            "query",
            RequestSpec::get("https://httpbin.org/get")
                .query("search", "Cypress")
                .query("page", 1)
                .build(),
        )
        .expect_arg("page", "1");

        let report = use_case.run(&scenario).await.expect("should run");
        assert_eq!(report.url, "https://httpbin.org/get?search=Cypress&page=1");
        assert_eq!(report.outcome, ScenarioOutcome::Passed);
    }

    #[tokio::test]
    async fn test_error_status_is_verified_not_raised() {
        let (_, use_case) = use_case(500);
        let scenario = Scenario::new(
            "server error",
            RequestSpec::delete("https://httpbin.org/delete")
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200)
        .expect_field("url");

        let report = use_case.run(&scenario).await.expect("should run");
        assert_eq!(report.outcome, ScenarioOutcome::Failed);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            report.first_failure().and_then(|r| r.error.clone()),
            Some("Expected status to strictly equal 200, got 500".to_string())
        );
    }

    #[tokio::test]
    async fn test_config_disables_stop_on_failure() {
        let (client, use_case) = use_case(500);
        let config = HarnessConfig::default().with_stop_on_failure(false);
        let use_case = ExecuteScenario::new(client, use_case.clock.clone()).with_config(&config);

        let request = RequestSpec::get("https://httpbin.org/get").build();
        let scenario = Scenario::new("all checks", request)
            .expect_status(200)
            .expect_field("url");

        let report = use_case.run(&scenario).await.expect("should run");
        assert_eq!(report.results.len(), 2);
        assert!(report.results[1].passed);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let (_, use_case) = use_case(200);
        let scenario = Scenario::new("offline", RequestSpec::get("http://offline/get").build())
            .expect_status(200);

        let result = use_case.run(&scenario).await;
        assert!(matches!(
            result,
            Err(ExecuteScenarioError::HttpError(HttpClientError::ConnectionRefused { .. }))
        ));
    }

    #[tokio::test]
    async fn test_suite_isolates_failures() {
        let (client, use_case) = use_case(200);
        let scenarios = vec![
            Scenario::new("first", RequestSpec::get("https://httpbin.org/get").build())
                .expect_status(200),
            Scenario::new("offline", RequestSpec::get("http://offline/get").build())
                .expect_status(200),
            Scenario::new("wrong status", RequestSpec::get("https://httpbin.org/get").build())
                .expect_status(201),
            Scenario::new("last", RequestSpec::get("https://httpbin.org/get").build())
                .expect_field("url"),
        ];

        let report = use_case.run_suite(&scenarios).await;

        assert_eq!(client.sent.lock().unwrap().len(), 4);
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errored, 1);
        assert_eq!(report.errors[0].scenario, "offline");
        assert_eq!(report.errors[0].message, "Connection refused by offline:80");
        assert!(!report.all_passed());
    }
}
