//! Echocheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;

pub use adapters::{RandomTokenGenerator, ReqwestHttpClient, SystemClock};
pub use config::{ReportFormat, load_config, load_report_format};
