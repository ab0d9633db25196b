//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use tracing::debug;

use echocheck_application::ports::{HttpClient, HttpClientError};
use echocheck_domain::request::{HttpMethod, RequestSpec};
use echocheck_domain::response::{ResponseRecord, StatusCode};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
pub struct ReqwestHttpClient {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: "echocheck/0.1.0", replaced by any `User-Agent` header
    ///   on the request
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        Self::with_timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("echocheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = timeout.as_millis() as u64;
        Ok(Self { client, timeout_ms })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Validates and converts the request headers.
    fn build_headers(request: &RequestSpec) -> Result<HeaderMap, HttpClientError> {
        let mut headers = HeaderMap::with_capacity(request.headers().len());
        for header in request.headers().all() {
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(|e| {
                HttpClientError::InvalidHeader {
                    name: header.name.clone(),
                    message: e.to_string(),
                }
            })?;
            let value =
                HeaderValue::from_str(&header.value).map_err(|e| HttpClientError::InvalidHeader {
                    name: header.name.clone(),
                    message: e.to_string(),
                })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Flattens response headers, joining repeated values with `", "`.
    fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
        let mut collected: HashMap<String, String> = HashMap::with_capacity(headers.keys_len());
        for (name, value) in headers {
            let value = value.to_str().unwrap_or("<binary>");
            collected
                .entry(name.to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        collected
    }

    /// Maps reqwest errors to domain `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| "unknown".to_string())
        };

        if error.is_connect() {
            let message = format!("{error:?}");
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message: error.to_string(),
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(error.to_string());
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_builder() {
            return HttpClientError::InvalidUrl(error.to_string());
        }

        HttpClientError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseRecord, HttpClientError> {
        let url = request
            .full_url()
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
        let headers = Self::build_headers(request)?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method()), url.clone())
            .headers(headers);

        // Sets Content-Type: application/json unless the request already has one.
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!(method = %request.method(), url = %url, "Sending request");
        let start = Instant::now();

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status().as_u16();
        if request.fail_on_status_code() && StatusCode::new(status).is_error() {
            return Err(HttpClientError::ErrorStatus {
                status,
                url: url.to_string(),
            });
        }

        let response_headers = Self::collect_headers(response.headers());

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?;

        let duration = start.elapsed();

        Ok(ResponseRecord::from_bytes(status, response_headers, &body_bytes, duration))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new().unwrap();
        assert_eq!(client.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_headers_are_converted() {
        let request = RequestSpec::get("https://httpbin.org/headers")
            .header("X-Custom-Header", "TestHeaderValue")
            .user_agent("CustomAgent/1.0")
            .build();

        let headers = ReqwestHttpClient::build_headers(&request).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-custom-header"], "TestHeaderValue");
        assert_eq!(headers["user-agent"], "CustomAgent/1.0");
    }

    #[test]
    fn test_invalid_header_value() {
        let request = RequestSpec::get("https://httpbin.org/headers")
            .header("X-Broken", "line\nbreak")
            .build();

        assert!(matches!(
            ReqwestHttpClient::build_headers(&request),
            Err(HttpClientError::InvalidHeader { name, .. }) if name == "X-Broken"
        ));
    }

    #[test]
    fn test_invalid_header_name() {
        let request = RequestSpec::get("https://httpbin.org/headers")
            .header("Bad Header", "value")
            .build();

        assert!(matches!(
            ReqwestHttpClient::build_headers(&request),
            Err(HttpClientError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_repeated_response_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let collected = ReqwestHttpClient::collect_headers(&headers);
        assert_eq!(collected.len(), 2);
        assert_eq!(collected["set-cookie"], "a=1, b=2");
        assert_eq!(collected["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_relative_url_is_rejected_before_sending() {
        let client = ReqwestHttpClient::new().unwrap();
        let request = RequestSpec::get("/get").build();

        let result = client.execute(&request).await;
        assert!(matches!(result, Err(HttpClientError::InvalidUrl(_))));
    }
}
