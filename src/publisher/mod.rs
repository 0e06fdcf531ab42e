//! The publisher adapter: encodes a notification and hands it to a topic.

pub mod sns;

pub use sns::SnsTopicPublisher;

use crate::core::{NotificationMessage, TopicPublisher};
use crate::error::Result;
use tracing::{debug, info, instrument};

/// Publishes notifications through a [`TopicPublisher`].
///
/// One call is one publish. There is no batching and no retry; failures go
/// straight back to the caller.
pub struct Publisher<P: TopicPublisher> {
    topic_publisher: P,
}

impl<P: TopicPublisher> Publisher<P> {
    pub fn new(topic_publisher: P) -> Self {
        Self { topic_publisher }
    }

    /// Encodes `message` and publishes it to `topic`.
    ///
    /// # Errors
    /// * `RelayError::Serialization` if the message cannot be encoded
    /// * `RelayError::Transport` if the publish call fails
    #[instrument(skip(self, message), fields(channel = %message.channel_id))]
    pub async fn publish(&self, topic: &str, message: &NotificationMessage) -> Result<()> {
        let payload = message.to_payload()?;
        debug!(bytes = payload.len(), "Encoded notification.");
        self.topic_publisher.publish(topic, &payload).await?;
        info!(topic, "Published notification.");
        Ok(())
    }
}
