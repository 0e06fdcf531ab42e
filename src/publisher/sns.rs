//! Amazon SNS implementation of [`TopicPublisher`].

use crate::core::TopicPublisher;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;
use tracing::{debug, error};

/// Publishes to SNS topics identified by ARN.
pub struct SnsTopicPublisher {
    client: aws_sdk_sns::Client,
}

impl SnsTopicPublisher {
    pub fn new(client: aws_sdk_sns::Client) -> Self {
        Self { client }
    }

    /// Builds a client from the AWS default provider chain, optionally
    /// pinning the region.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;
        Self::new(aws_sdk_sns::Client::new(&sdk_config))
    }
}

#[async_trait]
impl TopicPublisher for SnsTopicPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(payload)
            .send()
            .await
            .map_err(|e| {
                let reason = DisplayErrorContext(&e).to_string();
                error!(topic, %reason, "SNS publish failed");
                RelayError::Transport {
                    topic: topic.to_string(),
                    reason,
                }
            })?;
        debug!(message_id = output.message_id().unwrap_or_default(), "SNS accepted message.");
        Ok(())
    }
}
