//! HTTP client for the car's onboard web server.
//!
//! Every operation is exactly one `GET`. Nothing is retried, queued or
//! logged here: the caller sees each failure as it happened and decides what
//! to tell the user.

use super::error::ControlError;
use super::models::{Command, StatusSnapshot};
use crate::config::{normalize_base_url, ControlConfig};

#[derive(Debug, Clone)]
pub struct VehicleControlClient {
    base_url: String,
    http: reqwest::Client,
}

impl VehicleControlClient {
    /// Builds a client with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: &ControlConfig) -> Result<Self, ControlError> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(config.request_timeout)
            .build()?;

        Self::with_http_client(&config.base_url, http)
    }

    /// Uses a caller-supplied transport. The timeout is whatever that client
    /// was built with.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self, ControlError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn go_forward(&self) -> Result<(), ControlError> {
        self.send(&Command::Forward).await
    }

    pub async fn go_back(&self) -> Result<(), ControlError> {
        self.send(&Command::Backward).await
    }

    pub async fn go_left(&self) -> Result<(), ControlError> {
        self.send(&Command::Left).await
    }

    pub async fn go_right(&self) -> Result<(), ControlError> {
        self.send(&Command::Right).await
    }

    pub async fn stop(&self) -> Result<(), ControlError> {
        self.send(&Command::Stop).await
    }

    /// The car owns the light state; two calls are two identical requests.
    pub async fn toggle_light(&self) -> Result<(), ControlError> {
        self.send(&Command::ToggleLight).await
    }

    /// Shows `text` on the car. Whitespace-only text is rejected before any
    /// request goes out.
    pub async fn send_message(&self, text: &str) -> Result<(), ControlError> {
        self.send(&Command::SendMessage(text.to_string())).await
    }

    pub async fn send(&self, command: &Command) -> Result<(), ControlError> {
        if let Command::SendMessage(text) = command {
            if text.trim().is_empty() {
                return Err(ControlError::InvalidArgument(
                    "message must not be empty".to_string(),
                ));
            }
        }

        self.http
            .get(self.action_url(command))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    pub async fn get_status(&self) -> Result<StatusSnapshot, ControlError> {
        let body = self
            .http
            .get(format!("{}/status", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        serde_json::from_slice(&body).map_err(ControlError::MalformedResponse)
    }

    pub fn action_url(&self, command: &Command) -> String {
        format!("{}/action?go={}", self.base_url, command.query_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> VehicleControlClient {
        VehicleControlClient::with_http_client(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn test_action_url_uses_normalized_base() {
        let c = client("192.168.4.1/");
        assert_eq!(c.base_url(), "http://192.168.4.1");
        assert_eq!(c.action_url(&Command::Stop), "http://192.168.4.1/action?go=S");
    }

    #[test]
    fn test_rejects_invalid_base() {
        let result = VehicleControlClient::with_http_client("ftp://car", reqwest::Client::new());
        assert!(matches!(result, Err(ControlError::Config(_))));
    }
}
