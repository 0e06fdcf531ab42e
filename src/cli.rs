//! Command-Line Interface (CLI) argument parsing for the publisher.
//!
//! This module defines the command-line arguments using the `clap` crate.
//! The arguments that correspond to configuration keys are also exposed as a
//! figment `Provider`, so they override values from `snsrelay.toml` and the
//! environment.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

use crate::core::NotificationMessage;

/// Publish a notification to the SNS topic relayed into Slack.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// ARN of the destination topic.
    #[arg(short, long, value_name = "ARN")]
    pub topic: Option<String>,

    /// AWS region of the topic.
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Slack channel ID the subscriber should post to.
    #[arg(long, value_name = "CHANNEL_ID")]
    pub channel: String,

    /// Message body.
    #[arg(short, long, value_name = "TEXT")]
    pub message: String,

    /// User or group ID to mention. May be repeated; order is kept.
    #[arg(long = "mention", value_name = "ID")]
    pub mentions: Vec<String>,

    /// Log level, overriding the configured one.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// The notification described by the arguments.
    pub fn notification(&self) -> NotificationMessage {
        NotificationMessage::new(self.channel.clone(), self.message.clone())
            .with_mentions(self.mentions.iter().cloned())
    }
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut publisher = Dict::new();
        if let Some(topic) = &self.topic {
            publisher.insert("topic_arn".into(), Value::from(topic.clone()));
        }
        if let Some(region) = &self.region {
            publisher.insert("region".into(), Value::from(region.clone()));
        }

        let mut dict = Dict::new();
        if !publisher.is_empty() {
            dict.insert("publisher".into(), Value::from(publisher));
        }
        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
