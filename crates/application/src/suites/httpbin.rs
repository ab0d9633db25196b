//! Scenario catalog for an httpbin-compatible echo service.
//!
//! Every request disables failure on error statuses so the status check is
//! always evaluated by the verifier.

use serde_json::json;

use echocheck_domain::request::RequestSpec;
use echocheck_domain::testing::{Assertion, Scenario};

use crate::config::HarnessConfig;
use crate::ports::ValueGenerator;

/// Scenario names, in catalog order.
pub mod names {
    /// Plain GET.
    pub const GET: &str = "should successfully send a GET request";
    /// Round-trip time bound.
    pub const DURATION: &str = "should verify that the request takes less than the time limit";
    /// POST body echo.
    pub const POST: &str = "should successfully send a POST request";
    /// Custom header echo.
    pub const CUSTOM_HEADER: &str = "should send a custom header";
    /// Query parameter echo.
    pub const QUERY: &str =
        "should send a GET request with query parameters and verify the response";
    /// PUT body echo.
    pub const PUT: &str =
        "should send a PUT request and verify the response contains the same data";
    /// DELETE status and url field.
    pub const DELETE: &str = "should send a DELETE request and verify the response status";
    /// PATCH body echo.
    pub const PATCH: &str =
        "should send a PATCH request and verify the response contains the patched data";
    /// Generated query parameter echo.
    pub const RANDOM_PARAM: &str =
        "should send a GET request with a random parameter and verify the response contains it";
    /// User-Agent override.
    pub const USER_AGENT: &str =
        "should send a GET request with a custom User-Agent and verify it in the response";
}

const CUSTOM_HEADER: &str = "X-Custom-Header";
const CUSTOM_HEADER_VALUE: &str = "TestHeaderValue";
const CUSTOM_USER_AGENT: &str = "CustomAgent/1.0";
const RANDOM_PARAM: &str = "randomParam";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds the ten httpbin scenarios against `config.base_url()`.
///
/// The generator supplies the value of the random query parameter.
#[must_use]
pub fn httpbin_suite(config: &HarnessConfig, generator: &dyn ValueGenerator) -> Vec<Scenario> {
    let get = |path: &str| RequestSpec::get(config.endpoint(path)).fail_on_status_code(false);

    vec![
        Scenario::new(names::GET, get("/get").build()).expect_status(200),
        Scenario::new(names::DURATION, get("/get").build())
            .expect_duration_below(config.max_duration_ms()),
        Scenario::new(
            names::POST,
            RequestSpec::post(config.endpoint("/post"))
                .json(json!({"name": "John"}))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200)
        .expect_body_echo(),
        Scenario::new(
            names::CUSTOM_HEADER,
            get("/headers")
                .header(CUSTOM_HEADER, CUSTOM_HEADER_VALUE)
                .build(),
        )
        .expect_status(200)
        .expect_header(CUSTOM_HEADER, CUSTOM_HEADER_VALUE),
        Scenario::new(
            names::QUERY,
            get("/get")
                .query("search", "Cypress")
                .query("page", 1)
                .build(),
        )
        .expect_status(200)
        .expect_arg("search", "Cypress")
        .expect_arg("page", "1"),
        Scenario::new(
            names::PUT,
            RequestSpec::put(config.endpoint("/put"))
                .header("Content-Type", JSON_CONTENT_TYPE)
                .json(json!({"update": "true", "id": 123}))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200)
        .with_assertion(
            Assertion::body_echo("json")
                .with_description("Response should match the PUT request body"),
        ),
        Scenario::new(
            names::DELETE,
            RequestSpec::delete(config.endpoint("/delete"))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200)
        .expect_field("url"),
        Scenario::new(
            names::PATCH,
            RequestSpec::patch(config.endpoint("/patch"))
                .header("Content-Type", JSON_CONTENT_TYPE)
                .json(json!({"patchField": "newValue"}))
                .fail_on_status_code(false)
                .build(),
        )
        .expect_status(200)
        .with_assertion(
            Assertion::body_echo("json")
                .with_description("Response should match the PATCH request body"),
        ),
        Scenario::new(
            names::RANDOM_PARAM,
            get("/get")
                .query(RANDOM_PARAM, generator.next_token())
                .build(),
        )
        .expect_status(200)
        .expect_arg_echo(RANDOM_PARAM),
        Scenario::new(
            names::USER_AGENT,
            get("/user-agent").user_agent(CUSTOM_USER_AGENT).build(),
        )
        .expect_status(200)
        .with_assertion(
            Assertion::field_equals("user-agent", CUSTOM_USER_AGENT).with_description(
                "User-Agent in response should match the one sent in the request",
            ),
        ),
    ]
}
