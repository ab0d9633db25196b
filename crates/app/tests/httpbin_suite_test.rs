//! End-to-end tests: the reqwest transport and the scenario runner against an
//! in-process echo service.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use echocheck_application::suites::httpbin::names;
use echocheck_application::{
    ExecuteScenario, ExecuteScenarioError, HarnessConfig, HttpClient, HttpClientError,
    httpbin_suite,
};
use echocheck_domain::request::RequestSpec;
use echocheck_domain::testing::{Scenario, ScenarioOutcome};
use echocheck_infrastructure::{RandomTokenGenerator, ReqwestHttpClient, SystemClock};

fn runner(config: &HarnessConfig) -> ExecuteScenario<ReqwestHttpClient> {
    let client = Arc::new(ReqwestHttpClient::new().unwrap());
    ExecuteScenario::new(client, Arc::new(SystemClock::new())).with_config(config)
}

#[tokio::test]
async fn test_catalog_passes_against_echo_service() {
    let config = common::local_config().await;
    let scenarios = httpbin_suite(&config, &RandomTokenGenerator::seeded(1));

    let report = runner(&config).run_suite(&scenarios).await;

    for scenario in &report.scenarios {
        assert_eq!(
            scenario.outcome,
            ScenarioOutcome::Passed,
            "{}: {:?}",
            scenario.scenario,
            scenario.first_failure()
        );
    }
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(report.total, 10);
    assert_eq!(report.passed, 10);
    assert!(report.all_passed());
}

#[tokio::test]
async fn test_query_scenario_reports_full_url() {
    let config = common::local_config().await;
    let scenarios = httpbin_suite(&config, &RandomTokenGenerator::seeded(1));

    let report = runner(&config).run_suite(&scenarios).await;
    let query = report.scenario(names::QUERY).unwrap();

    assert_eq!(
        query.url,
        format!("{}/get?search=Cypress&page=1", config.base_url())
    );
    assert_eq!(query.results.len(), 5);
}

#[tokio::test]
async fn test_body_round_trips_for_every_body_method() {
    let config = common::local_config().await;
    let client = ReqwestHttpClient::new().unwrap();
    let bodies = [
        json!({"name": "John"}),
        json!({"update": "true", "id": 123}),
        json!({"nested": {"list": [1, 2.5, null, true], "text": "zażółć"}}),
        json!([]),
    ];

    for body in bodies {
        for request in [
            RequestSpec::post(config.endpoint("/post")),
            RequestSpec::put(config.endpoint("/put")),
            RequestSpec::patch(config.endpoint("/patch")),
        ] {
            let request = request.json(body.clone()).build();
            let response = client.execute(&request).await.unwrap();
            assert_eq!(response.status, 200);
            assert_eq!(response.field("json"), Some(&body));
        }
    }
}

#[tokio::test]
async fn test_custom_headers_are_echoed_exactly() {
    let config = common::local_config().await;
    let client = ReqwestHttpClient::new().unwrap();
    let request = RequestSpec::get(config.endpoint("/headers"))
        .header("X-Custom-Header", "TestHeaderValue")
        .header("X-Trace-Id", "abc-123 / def")
        .build();

    let response = client.execute(&request).await.unwrap();
    let headers = response.field("headers").unwrap();

    assert_eq!(headers["X-Custom-Header"], "TestHeaderValue");
    assert_eq!(headers["X-Trace-Id"], "abc-123 / def");
}

#[tokio::test]
async fn test_query_values_are_string_coerced() {
    let config = common::local_config().await;
    let client = ReqwestHttpClient::new().unwrap();
    let request = RequestSpec::get(config.endpoint("/get"))
        .query("search", "Cypress")
        .query("page", 1)
        .query("ratio", 2.5)
        .query("q", "a b&c")
        .build();

    let response = client.execute(&request).await.unwrap();

    assert_eq!(
        response.field("args"),
        Some(&json!({"search": "Cypress", "page": "1", "ratio": "2.5", "q": "a b&c"}))
    );
}

#[tokio::test]
async fn test_user_agent_override_replaces_default() {
    let config = common::local_config().await;
    let client = ReqwestHttpClient::new().unwrap();

    let custom = RequestSpec::get(config.endpoint("/user-agent"))
        .user_agent("CustomAgent/1.0")
        .build();
    let response = client.execute(&custom).await.unwrap();
    assert_eq!(response.field("user-agent"), Some(&json!("CustomAgent/1.0")));

    let default = RequestSpec::get(config.endpoint("/user-agent")).build();
    let response = client.execute(&default).await.unwrap();
    assert!(
        response.field("user-agent").and_then(|v| v.as_str()).unwrap().starts_with("echocheck/")
    );
}

#[tokio::test]
async fn test_error_status_is_verified_when_not_failing_on_status() {
    let config = common::local_config().await;
    let scenario = Scenario::new(
        "server error",
        RequestSpec::get(config.endpoint("/status/500"))
            .fail_on_status_code(false)
            .build(),
    )
    .expect_status(200)
    .expect_field("url");

    let report = runner(&config).run(&scenario).await.unwrap();

    assert_eq!(report.status, 500);
    assert_eq!(report.outcome, ScenarioOutcome::Failed);
    assert_eq!(report.skipped, 1);
    assert_eq!(
        report.first_failure().and_then(|r| r.error.as_deref()),
        Some("Expected status to strictly equal 200, got 500")
    );
}

#[tokio::test]
async fn test_error_status_raises_when_failing_on_status() {
    let config = common::local_config().await;
    let scenario = Scenario::new(
        "not found",
        RequestSpec::get(config.endpoint("/status/404")).build(),
    )
    .expect_status(200);

    let result = runner(&config).run(&scenario).await;

    assert!(matches!(
        result,
        Err(ExecuteScenarioError::HttpError(HttpClientError::ErrorStatus { status: 404, .. }))
    ));
}

#[tokio::test]
async fn test_wrong_method_is_reported_as_failure() {
    let config = common::local_config().await;
    let scenario = Scenario::new(
        "post to get",
        RequestSpec::post(config.endpoint("/get"))
            .json(json!({"name": "John"}))
            .fail_on_status_code(false)
            .build(),
    )
    .expect_status(200)
    .expect_body_echo();

    let report = runner(&config).run(&scenario).await.unwrap();

    assert_eq!(report.status, 405);
    assert_eq!(report.outcome, ScenarioOutcome::Failed);
}

#[tokio::test]
async fn test_slow_response_is_flaky_not_failed() {
    let config = common::local_config().await.with_max_duration_ms(20);
    let scenarios = vec![
        Scenario::new(
            "slow",
            RequestSpec::get(config.endpoint("/delay/100"))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_duration_below(config.max_duration_ms())
        .expect_status(200)
        .expect_field("url"),
    ];

    let report = runner(&config).run_suite(&scenarios).await;
    let slow = &report.scenarios[0];

    assert_eq!(slow.outcome, ScenarioOutcome::Flaky);
    assert_eq!(slow.results.len(), 3);
    assert_eq!(slow.soft_failures().count(), 1);
    assert_eq!(report.flaky, 1);
    assert!(report.all_passed());
}

#[tokio::test]
async fn test_transport_failure_does_not_stop_the_suite() {
    let offline = HarnessConfig::new(common::closed_port_url().await).unwrap();
    let online = common::local_config().await;
    let scenarios = vec![
        Scenario::new(
            "offline",
            RequestSpec::get(offline.endpoint("/get"))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200),
        Scenario::new(
            "online",
            RequestSpec::get(online.endpoint("/get"))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200),
    ];

    let report = runner(&online).run_suite(&scenarios).await;

    assert_eq!(report.errored, 1);
    assert_eq!(report.errors[0].scenario, "offline");
    assert_eq!(report.passed, 1);
    assert!(!report.all_passed());
}
