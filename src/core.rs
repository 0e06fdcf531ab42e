//! Core domain types and service traits for the relay
//!
//! This module defines the notification record that travels over the topic
//! and the two capability traits the relay talks to: a topic publisher and
//! a chat poster. Production code plugs in SNS and Slack; tests plug in
//! fakes.

use crate::error::{RelayError, Result};
use crate::formatting;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// A notification headed for a chat channel.
///
/// This is also the wire format: it is encoded as a flat JSON object and
/// carried opaquely as the topic message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NotificationMessage {
    /// Destination chat channel ID (e.g. `C0123456789`).
    #[serde(default)]
    pub channel_id: String,
    /// Body text.
    #[serde(default)]
    pub message: String,
    /// User or group IDs to mention ahead of the body, in order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mentions: Vec<String>,
}

impl NotificationMessage {
    pub fn new(channel_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message: message.into(),
            mentions: Vec::new(),
        }
    }

    /// Adds mentions, keeping the given order.
    pub fn with_mentions<I, S>(mut self, mentions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mentions.extend(mentions.into_iter().map(Into::into));
        self
    }

    /// Encodes the message into the topic payload.
    pub fn to_payload(&self) -> Result<String> {
        serde_json::to_string(self).map_err(RelayError::Serialization)
    }

    /// Decodes a topic payload. Absent fields decode as empty; use
    /// [`validate`](Self::validate) to reject them.
    pub fn from_payload(payload: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload).map_err(RelayError::Decode)?;
        // The derived impl would also accept the positional array form.
        if !value.is_object() {
            return Err(RelayError::Decode(serde::de::Error::custom(
                "notification payload must be a JSON object",
            )));
        }
        serde_json::from_value(value).map_err(RelayError::Decode)
    }

    /// Checks that `channel_id` and `message` are both non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.channel_id.is_empty() {
            return Err(RelayError::Validation("channel_id is missing".to_string()));
        }
        if self.message.is_empty() {
            return Err(RelayError::Validation("message is missing".to_string()));
        }
        Ok(())
    }

    /// The text that ends up in the chat channel: mentions, then the body.
    pub fn render_text(&self) -> String {
        formatting::render_text(&self.mentions, &self.message)
    }
}

// Publishers that marshal an unset list emit `"mentions": null`.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// =============================================================================
// Service Traits
// =============================================================================

/// Submits text payloads to a pub/sub topic.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    /// Publishes `payload` to `topic`.
    ///
    /// # Returns
    /// * `Ok(())` once the service acknowledged the publish
    /// * `Err(RelayError::Transport)` on authentication, network or service errors
    async fn publish(&self, topic: &str, payload: &str) -> Result<()>;
}

/// Posts text messages to a chat channel.
#[async_trait]
pub trait ChatPoster: Send + Sync {
    /// Posts `text` to `channel`.
    ///
    /// # Returns
    /// * `Ok(())` if the chat service accepted the message
    /// * `Err(RelayError::Delivery)` otherwise
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;
}
