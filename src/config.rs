use std::fmt;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub const DEFAULT_API_RELEASE: &str = "8.0.1.0";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::ERROR;

#[derive(Clone)]
pub struct Endpoint {
    pub host: String,
    pub username: String,
    pub password: String,
    pub api_release: String,
    pub verify_tls: bool,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_release", &self.api_release)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("{0}")]
    Validation(String),
}

impl Endpoint {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            api_release: DEFAULT_API_RELEASE.to_string(),
            verify_tls: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("endpoint", &self.host)?;
        require_non_empty("username", &self.username)?;
        if self.password.is_empty() {
            return Err(ConfigError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        require_non_empty("api release", &self.api_release)?;
        if self.api_release.contains('/') {
            return Err(ConfigError::Validation(format!(
                "api release '{}' must be a single path segment",
                self.api_release
            )));
        }
        self.api_base().map(|_| ())
    }

    /// Base URL of the VI/JSON API, always ending in `/` so relative joins
    /// stay under the release segment.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let host = self.host.trim();
        let origin = if host.contains("://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };
        let raw = format!("{origin}/sdk/vim25/{}/", self.api_release.trim());
        Url::parse(&raw).map_err(|source| ConfigError::Endpoint {
            endpoint: self.host.clone(),
            source,
        })
    }
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Accepts the level names Nagios command definitions already pass
/// (`DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`, or their numeric values).
/// tracing has no level above `error`, so `CRITICAL` shares it.
pub fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    let level = match raw.trim().to_ascii_lowercase().as_str() {
        "critical" | "fatal" | "error" | "50" | "40" => LevelFilter::ERROR,
        "warning" | "warn" | "30" => LevelFilter::WARN,
        "info" | "20" => LevelFilter::INFO,
        "debug" | "10" => LevelFilter::DEBUG,
        "notset" | "trace" | "0" => LevelFilter::TRACE,
        "off" | "none" => LevelFilter::OFF,
        _ => {
            return Err(format!(
                "unknown log level '{raw}' (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)"
            ))
        }
    };
    Ok(level)
}
