//! Value generator port
//!
//! Scenarios that send a fresh value on every run draw it from here, so
//! verification stays deterministic under test.

/// Port for producing per-run values such as random query parameters.
pub trait ValueGenerator: Send + Sync {
    /// Returns the next generated token.
    fn next_token(&self) -> String;
}

impl<F> ValueGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_token(&self) -> String {
        self()
    }
}
