pub mod guest_power;
pub mod host_temperature;

use crate::api::{ApiError, Session};
use crate::config::ConfigError;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub use guest_power::GuestPowerCheck;
pub use host_temperature::HostTemperatureCheck;

/// Nagios service state; carries the output label and the plugin exit code.
pub use nagiosplugin::ServiceState as Status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
    pub perf_data: Option<String>,
}

impl CheckResult {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            perf_data: None,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Status::Unknown, message)
    }

    pub fn with_perf_data(mut self, perf_data: impl Into<String>) -> Self {
        self.perf_data = Some(perf_data.into());
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

/// Renders the plugin output line: `<LABEL> - <message>[|<perfdata>]`.
impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.status, self.message)?;
        if let Some(perf) = &self.perf_data {
            write!(f, "|{perf}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Unable to open the connection to {endpoint}")]
    Connection { endpoint: String },
    #[error("Unable to find guest with UUID {uuid}")]
    GuestNotFound { uuid: String },
    #[error("Unable to find host {dns_name}")]
    HostNotFound { dns_name: String },
    #[error("Unable to find temperature sensor named {prefix}")]
    SensorNotFound { prefix: String },
    #[error("Query against the management endpoint failed: {0}")]
    Query(#[from] ApiError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid arguments: {0}")]
    Arguments(String),
}

/// Every failure is terminal and reported as UNKNOWN.
impl From<CheckError> for CheckResult {
    fn from(err: CheckError) -> Self {
        CheckResult::unknown(err.to_string())
    }
}

/// One probe configuration of the check contract: locate a target through
/// the session, read its state and classify it.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rejects target settings that could never match, before any connection
    /// is opened.
    fn validate(&self) -> Result<(), ConfigError>;

    async fn evaluate<S: Session>(&self, session: &S) -> Result<CheckResult, CheckError>;
}
