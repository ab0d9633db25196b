//! Echocheck - Main Entry Point
//!
//! Runs the httpbin scenario catalog against the configured echo service
//! and reports the outcome of every scenario.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use echocheck_application::{ExecuteScenario, httpbin_suite};
use echocheck_domain::response::StatusCode;
use echocheck_domain::testing::SuiteReport;
use echocheck_infrastructure::{
    RandomTokenGenerator, ReportFormat, ReqwestHttpClient, SystemClock, load_config,
    load_report_format,
};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;
    let format = load_report_format();
    tracing::info!(
        base_url = config.base_url(),
        "Starting echocheck v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(ReqwestHttpClient::new()?);
    let use_case = ExecuteScenario::new(client, Arc::new(SystemClock::new())).with_config(&config);
    let scenarios = httpbin_suite(&config, &RandomTokenGenerator::new());

    let report = use_case.run_suite(&scenarios).await;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_summary(&report),
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(report: &SuiteReport) {
    for scenario in &report.scenarios {
        println!(
            "[{}] {} ({} -> {}, {}ms)",
            scenario.outcome.label(),
            scenario.scenario,
            scenario.method,
            StatusCode::new(scenario.status),
            scenario.duration_ms
        );
        for result in scenario.results.iter().filter(|r| !r.passed) {
            println!(
                "    - {}: {}",
                result.description,
                result.error.as_deref().unwrap_or_default()
            );
        }
        if scenario.skipped > 0 {
            println!("    ({} check(s) skipped)", scenario.skipped);
        }
    }

    for error in &report.errors {
        println!("[ERROR] {}: {}", error.scenario, error.message);
    }

    println!(
        "\n{} scenarios: {} passed, {} flaky, {} failed, {} errored ({:.0}% pass rate)",
        report.total,
        report.passed,
        report.flaky,
        report.failed,
        report.errored,
        report.pass_rate()
    );
}
