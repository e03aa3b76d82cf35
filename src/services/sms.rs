//! SMS delivery client
//!
//! Thin wrapper around the Twilio Messages API. The API base is configurable
//! so tests can run against a local mock server.

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::SmsConfig;

/// SMS delivery errors
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("SMS request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("SMS provider rejected the message ({status}): {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: Option<String>,
}

/// Twilio SMS client
pub struct SmsClient {
    http: reqwest::Client,
    config: SmsConfig,
}

impl SmsClient {
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Send a single SMS, returning the provider message SID
    pub async fn send(&self, to: &str, body: &str) -> Result<String, SmsError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base, self.config.account_sid
        );

        let params = [
            ("To", to),
            ("From", self.config.from_phone.as_str()),
            ("Body", body),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Provider { status, body });
        }

        let message: MessageResponse = response.json().await?;
        let sid = message.sid.unwrap_or_default();
        debug!(to = %to, sid = %sid, "SMS accepted by provider");

        Ok(sid)
    }
}
