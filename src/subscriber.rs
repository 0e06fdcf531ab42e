//! The subscriber side: turns delivered topic messages into chat posts.
//!
//! A handler is built once from validated [`SubscriberSettings`] and is then
//! invoked per delivery batch. Records are processed strictly in delivery
//! order and the first failure aborts the rest of the batch; redelivery is
//! left to the invoking harness.

use crate::config::{Config, DeliveryMode};
use crate::core::{ChatPoster, NotificationMessage};
use crate::error::{RelayError, Result};
use aws_lambda_events::event::sns::SnsEvent;
use std::fmt;
use tracing::{debug, error, info, instrument};

/// What the handler does with each payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriberMode {
    /// Decode, validate, render mentions, post to the message's channel.
    Structured,
    /// Post the raw payload verbatim to a fixed channel.
    Passthrough { channel_id: String },
}

/// Startup settings for the subscriber, checked before any record is seen.
#[derive(Clone)]
pub struct SubscriberSettings {
    pub bot_token: String,
    pub mode: SubscriberMode,
}

impl fmt::Debug for SubscriberSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberSettings")
            .field("bot_token", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

impl SubscriberSettings {
    /// Validates the subscriber's part of the configuration.
    ///
    /// # Errors
    /// `RelayError::Configuration` if the bot token is missing or empty, or
    /// if passthrough mode has no fallback channel.
    pub fn from_config(config: &Config) -> Result<Self> {
        let bot_token = non_empty(config.slack.bot_token.as_deref()).ok_or_else(|| {
            RelayError::Configuration("Slack bot token is not set (SLACK_BOT_TOKEN)".to_string())
        })?;

        let mode = match config.subscriber.mode {
            DeliveryMode::Structured => SubscriberMode::Structured,
            DeliveryMode::Passthrough => {
                let channel_id = non_empty(config.subscriber.fallback_channel_id.as_deref())
                    .ok_or_else(|| {
                        RelayError::Configuration(
                            "passthrough mode requires a fallback channel (SLACK_CHANNEL_ID)"
                                .to_string(),
                        )
                    })?;
                SubscriberMode::Passthrough { channel_id }
            }
        };

        Ok(Self { bot_token, mode })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Outcome of a fully processed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Number of messages posted to chat.
    pub posted: usize,
}

/// Relays delivered payloads to chat through a [`ChatPoster`].
pub struct SubscriberHandler<C: ChatPoster> {
    mode: SubscriberMode,
    chat: C,
}

impl<C: ChatPoster> SubscriberHandler<C> {
    pub fn new(mode: SubscriberMode, chat: C) -> Self {
        Self { mode, chat }
    }

    /// Handles one SNS-triggered Lambda invocation.
    pub async fn handle_event(&self, event: &SnsEvent) -> Result<BatchSummary> {
        self.handle_payloads(event.records.iter().map(|record| record.sns.message.as_str()))
            .await
    }

    /// Processes a batch of raw payloads in order, stopping at the first error.
    #[instrument(skip_all)]
    pub async fn handle_payloads<'a, I>(&self, payloads: I) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut summary = BatchSummary::default();
        for (index, payload) in payloads.into_iter().enumerate() {
            if let Err(e) = self.process(payload).await {
                error!(record = index, posted = summary.posted, error = %e, "Aborting batch.");
                return Err(e);
            }
            summary.posted += 1;
        }
        info!(posted = summary.posted, "Batch relayed.");
        Ok(summary)
    }

    async fn process(&self, payload: &str) -> Result<()> {
        let (channel, text) = match &self.mode {
            SubscriberMode::Structured => {
                let message = NotificationMessage::from_payload(payload)?;
                message.validate()?;
                debug!(
                    channel = %message.channel_id,
                    mentions = message.mentions.len(),
                    "Decoded notification."
                );
                let text = message.render_text();
                (message.channel_id, text)
            }
            SubscriberMode::Passthrough { channel_id } => {
                if payload.is_empty() {
                    return Err(RelayError::Validation("payload is empty".to_string()));
                }
                (channel_id.clone(), payload.to_string())
            }
        };

        self.chat.post_message(&channel, &text).await?;
        info!(%channel, "Relayed message to chat.");
        Ok(())
    }
}
