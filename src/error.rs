//! Error types shared by the publisher and subscriber sides.

use thiserror::Error;

/// Every failure the relay can surface to its caller.
///
/// Nothing in this crate retries. Each variant is returned to whoever
/// invoked us: the publishing caller, or the Lambda harness for the
/// subscriber, which owns redelivery.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A required setting (credential, channel, topic) is missing or empty.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The notification could not be encoded to JSON.
    #[error("failed to serialize notification: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A delivered payload is not a well-formed notification.
    #[error("failed to decode notification payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// A decoded notification is missing a required field.
    #[error("invalid notification: {0}")]
    Validation(String),

    /// The pub/sub publish call failed.
    #[error("failed to publish to topic {topic}: {reason}")]
    Transport { topic: String, reason: String },

    /// The chat post call failed.
    #[error("failed to post to channel {channel}: {reason}")]
    Delivery { channel: String, reason: String },
}

pub type Result<T, E = RelayError> = std::result::Result<T, E>;
