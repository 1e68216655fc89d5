use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ControlError {
    /// Caller handed us something we refuse to put on the wire.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The round trip failed: unreachable car, timeout, or a non-2xx answer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The car answered `/status` but the body was not a status document.
    #[error("malformed status response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ControlError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ControlError::Transport(e) if e.is_timeout())
    }

    /// HTTP status of a rejected request, if the car answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ControlError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
