//! Observed response type
//!
//! A `ResponseRecord` is what the transport hands back after a round trip:
//! status, timing, headers and the body parsed as JSON.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::StatusCode;

/// HTTP response as observed by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// HTTP status code.
    pub status: u16,
    /// Round-trip time measured by the transport.
    #[serde(rename = "duration_ms", with = "duration_millis")]
    pub duration: Duration,
    /// Response headers keyed by lowercase name. Repeated headers are
    /// joined with `", "`.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body. JSON bodies are parsed; anything else is kept as a
    /// string and an empty body is `null`.
    pub body: serde_json::Value,
}

impl ResponseRecord {
    /// Creates a record from an already-parsed body.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: serde_json::Value,
        duration: Duration,
    ) -> Self {
        Self {
            status: status.into().0,
            duration,
            headers,
            body,
        }
    }

    /// Creates a record from raw body bytes, parsing them as JSON when possible.
    #[must_use]
    pub fn from_bytes(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: &[u8],
        duration: Duration,
    ) -> Self {
        Self::new(status, headers, parse_body(body), duration)
    }

    /// Returns the round-trip time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_micros() as f64 / 1000.0
    }

    /// Returns a top-level body field, if the body is an object containing it.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.body.as_object().and_then(|object| object.get(name))
    }
}

fn parse_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
    })
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
