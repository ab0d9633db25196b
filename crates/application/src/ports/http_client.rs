//! HTTP Client port

use async_trait::async_trait;
use thiserror::Error;

use echocheck_domain::{request::RequestSpec, response::ResponseRecord};

/// Errors raised by the transport. Assertion mismatches are never reported
/// through this type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be parsed or is not absolute.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value contains characters HTTP does not allow.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader {
        /// Offending header name.
        name: String,
        /// What was wrong with it.
        message: String,
    },

    /// The body could not be encoded.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// The request timed out.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("Connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("Too many redirects (max {max})")]
    TooManyRedirects {
        /// Configured limit.
        max: usize,
    },

    /// A 4xx/5xx status was returned and the request asked to fail on it.
    #[error("Request to {url} failed with status {status}")]
    ErrorStatus {
        /// Returned status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the observed response.
    ///
    /// Implementations must send every header of the request, serialize the
    /// query parameters, JSON-encode the body, and measure the round trip.
    ///
    /// # Errors
    ///
    /// Returns an error on network failures, on invalid URLs or headers, and
    /// on 4xx/5xx statuses when `request.fail_on_status_code()` is set.
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseRecord, HttpClientError>;
}
