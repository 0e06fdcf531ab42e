//! snsrelay - relays notifications from an SNS topic into Slack
//!
//! The publisher side encodes a [`NotificationMessage`] and publishes it to a
//! topic. The subscriber side runs as a Lambda function, decodes each
//! delivered message and posts it to the channel it names, with mentions.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod formatting;
pub mod logging;
pub mod notification;
pub mod publisher;
pub mod subscriber;
#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-export core types for convenience
pub use crate::core::*;
pub use error::{RelayError, Result};
