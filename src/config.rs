use std::env;
use std::time::Duration;
use thiserror::Error;

/// Access-point address the car firmware serves on by default.
pub const DEFAULT_BASE_URL: &str = "http://192.168.4.1";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_STATUS_POLL_SECS: u64 = 3;
pub const DEFAULT_STALE_AFTER_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct ControlConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub status_poll_interval: Duration,
    pub stale_after: Duration,
}

impl ControlConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ControlConfig {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CAR_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        normalize_base_url(&base_url)?;

        Ok(ControlConfig {
            base_url,
            request_timeout: Duration::from_millis(positive(
                &lookup,
                "CAR_REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?),
            status_poll_interval: Duration::from_secs(positive(
                &lookup,
                "CAR_STATUS_POLL_SECS",
                DEFAULT_STATUS_POLL_SECS,
            )?),
            stale_after: Duration::from_secs(positive(
                &lookup,
                "CAR_STALE_AFTER_SECS",
                DEFAULT_STALE_AFTER_SECS,
            )?),
        })
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            status_poll_interval: Duration::from_secs(DEFAULT_STATUS_POLL_SECS),
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
        }
    }
}

// Zero would mean "no timeout" to reqwest and a busy loop to the poller.
fn positive<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
    }
}

/// Turns `192.168.4.1`, `http://192.168.4.1/` and friends into
/// `http://192.168.4.1`, so command paths can be appended with `format!`.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = reqwest::Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
