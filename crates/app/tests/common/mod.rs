//! In-process httpbin-style echo service for integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, Uri, header::HOST},
    routing::{delete, get, patch, post, put},
};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

use echocheck_application::HarnessConfig;

/// Starts the echo service on an ephemeral port and returns its base URL.
pub async fn spawn_echo_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind echo server");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router()).await.expect("echo server");
    });

    format!("http://{addr}")
}

/// Harness configuration pointing at a fresh echo service.
pub async fn local_config() -> HarnessConfig {
    HarnessConfig::new(spawn_echo_server().await).expect("valid base url")
}

/// Returns a base URL on which nothing is listening.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn router() -> Router {
    Router::new()
        .route("/get", get(echo))
        .route("/post", post(echo))
        .route("/put", put(echo))
        .route("/patch", patch(echo))
        .route("/delete", delete(echo))
        .route("/headers", get(headers))
        .route("/user-agent", get(user_agent))
        .route("/status/{code}", get(status))
        .route("/delay/{ms}", get(delay))
}

async fn echo(
    uri: Uri,
    Query(args): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost")
        .to_string();
    let json_body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    Json(json!({
        "args": args,
        "headers": echoed_headers(&headers),
        "json": json_body,
        "url": format!("http://{host}{uri}"),
    }))
}

async fn headers(headers: HeaderMap) -> Json<Value> {
    Json(json!({ "headers": echoed_headers(&headers) }))
}

async fn user_agent(headers: HeaderMap) -> Json<Value> {
    let agent = headers
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    Json(json!({ "user-agent": agent }))
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn delay(Path(ms): Path<u64>, uri: Uri) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({ "url": uri.to_string() }))
}

/// Header names arrive lowercased; report them title-cased.
fn echoed_headers(headers: &HeaderMap) -> Map<String, Value> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                title_case(name.as_str()),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect()
}

fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}
