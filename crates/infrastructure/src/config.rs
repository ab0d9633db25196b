//! Configuration loading from the process environment.

use echocheck_application::config::{ConfigError, HarnessConfig};
use tracing::{debug, warn};

/// Environment key selecting the report format.
pub const ENV_REPORT: &str = "ECHOCHECK_REPORT";

/// How the binary prints the suite report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// One line per scenario plus a summary.
    #[default]
    Text,
    /// The serialized suite report.
    Json,
}

impl ReportFormat {
    /// Parses a format name. Unset or unknown values select `Text`.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            None | Some("") => Self::Text,
            Some(v) if v.eq_ignore_ascii_case("text") => Self::Text,
            Some(other) => {
                warn!(key = ENV_REPORT, value = other, "Unknown report format, using text");
                Self::Text
            }
        }
    }
}

/// Builds the harness configuration from `ECHOCHECK_*` environment variables.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_config() -> Result<HarnessConfig, ConfigError> {
    let config = HarnessConfig::from_lookup(|key| std::env::var(key).ok())?;
    debug!(
        base_url = config.base_url(),
        max_duration_ms = config.max_duration_ms(),
        stop_on_failure = config.stop_on_failure(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Reads the report format from `ECHOCHECK_REPORT`.
#[must_use]
pub fn load_report_format() -> ReportFormat {
    ReportFormat::from_value(std::env::var(ENV_REPORT).ok().as_deref())
}
