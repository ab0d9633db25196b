//! Echocheck Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (transport, value generation, clock)
//! - The response verifier
//! - Scenario execution and the httpbin scenario catalog
//! - Harness configuration

pub mod config;
pub mod ports;
pub mod suites;
pub mod use_cases;
pub mod verifier;

pub use config::{ConfigError, HarnessConfig};
pub use ports::{Clock, HttpClient, HttpClientError, ValueGenerator};
pub use suites::httpbin_suite;
pub use use_cases::{ExecuteScenario, ExecuteScenarioError};
pub use verifier::{ResponseVerifier, Verification};
