//! Request specification type and its builder

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Header, Headers, HttpMethod, QueryParam, QueryParams, QueryValue};
use crate::error::{DomainError, DomainResult};

/// Complete description of the HTTP request a scenario sends.
///
/// A `RequestSpec` is produced by [`RequestBuilder`] and is not modified
/// afterwards; the transport reads it, and the verifier reads it again to
/// derive expectations such as the body that should be echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    method: HttpMethod,
    url: String,
    #[serde(default)]
    headers: Headers,
    #[serde(default)]
    query: QueryParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<serde_json::Value>,
    #[serde(default = "default_fail_on_status_code")]
    fail_on_status_code: bool,
}

const fn default_fail_on_status_code() -> bool {
    true
}

impl RequestSpec {
    /// Starts building a request with the given method and URL.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// Starts building a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(HttpMethod::Get, url)
    }

    /// Starts building a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(HttpMethod::Post, url)
    }

    /// Starts building a PUT request.
    #[must_use]
    pub fn put(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(HttpMethod::Put, url)
    }

    /// Starts building a PATCH request.
    #[must_use]
    pub fn patch(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(HttpMethod::Patch, url)
    }

    /// Starts building a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(HttpMethod::Delete, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Target URL, without the query parameters.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers, including a User-Agent override when one was set.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Query parameters.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Whether the transport should fail on a 4xx/5xx status.
    #[must_use]
    pub const fn fail_on_status_code(&self) -> bool {
        self.fail_on_status_code
    }

    /// Returns the URL with the query parameters appended in their wire form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the URL is empty, malformed or
    /// relative.
    pub fn full_url(&self) -> DomainResult<Url> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url)))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query.wire_pairs() {
                pairs.append_pair(key, &value);
            }
        }

        Ok(url)
    }
}

/// Builder for [`RequestSpec`].
///
/// Construction never fails: URL and header validity are checked by the
/// transport when the request is sent.
#[derive(Debug, Clone)]
#[must_use]
pub struct RequestBuilder {
    spec: RequestSpec,
}

impl RequestBuilder {
    /// Creates a builder for the given method and URL.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            spec: RequestSpec {
                method,
                url: url.into(),
                headers: Headers::new(),
                query: QueryParams::new(),
                body: None,
                fail_on_status_code: default_fail_on_status_code(),
            },
        }
    }

    /// Adds a header; a later header with the same name wins.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.headers.set(Header::new(name, value));
        self
    }

    /// Overrides the User-Agent sent by the transport.
    pub fn user_agent(self, value: impl Into<String>) -> Self {
        self.header("User-Agent", value)
    }

    /// Adds a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.spec.query.add(QueryParam::new(key, value));
        self
    }

    /// Sets the JSON body.
    pub fn json(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.spec.body = Some(body.into());
        self
    }

    /// Controls whether a 4xx/5xx status aborts the request at the transport.
    pub const fn fail_on_status_code(mut self, fail: bool) -> Self {
        self.spec.fail_on_status_code = fail;
        self
    }

    /// Finishes the request description.
    #[must_use]
    pub fn build(self) -> RequestSpec {
        self.spec
    }
}
