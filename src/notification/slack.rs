//! A client for posting messages to Slack through the Web API.

use crate::config::SlackConfig;
use crate::core::ChatPoster;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Response body of `chat.postMessage`.
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

/// A client for `chat.postMessage`, authenticated with a bot token.
pub struct SlackClient {
    http: reqwest::Client,
    bot_token: String,
    base_url: String,
}

impl SlackClient {
    /// Creates a client against a custom API base URL and request timeout.
    pub fn with_base_url(bot_token: String, base_url: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            bot_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the `[slack]` section and an already validated token.
    pub fn from_config(config: &SlackConfig, bot_token: String) -> Result<Self> {
        Self::with_base_url(
            bot_token,
            config.api_base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    async fn send_request(&self, channel: &str, text: &str) -> std::result::Result<(), String> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let payload = json!({ "channel": channel, "text": text });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("HTTP request to Slack failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("status {status}, body: {body}"));
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| format!("unreadable chat.postMessage response: {e}"))?;
        if !body.ok {
            let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(format!("chat.postMessage failed: {reason}"));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPoster for SlackClient {
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        match self.send_request(channel, text).await {
            Ok(()) => {
                info!("Posted message to Slack.");
                Ok(())
            }
            Err(reason) => {
                error!(%reason, "Failed to post Slack message");
                Err(RelayError::Delivery {
                    channel: channel.to_string(),
                    reason,
                })
            }
        }
    }
}
