//! Scenario catalogs.

pub mod httpbin;

pub use httpbin::httpbin_suite;
