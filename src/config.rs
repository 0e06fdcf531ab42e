//! Configuration management for snsrelay
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all application settings. It uses the `figment`
//! crate to layer defaults, an optional `snsrelay.toml` file, environment
//! variables and, for the publisher CLI, command-line flags.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Config file used when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "snsrelay.toml";
/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SNSRELAY_CONFIG";

/// Bare environment variables accepted for the settings deployments
/// usually inject directly.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("SLACK_BOT_TOKEN", "slack.bot_token"),
    ("SLACK_CHANNEL_ID", "subscriber.fallback_channel_id"),
    ("SNS_TOPIC_ARN", "publisher.topic_arn"),
];

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Line format for log output.
    pub log_format: LogFormat,
    /// Settings for the Slack Web API client.
    pub slack: SlackConfig,
    /// Settings for the Lambda subscriber.
    pub subscriber: SubscriberConfig,
    /// Settings for the SNS publisher.
    pub publisher: PublisherConfig,
}

/// The format for log lines.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Configuration for the Slack Web API client.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`) used to call `chat.postMessage`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub bot_token: Option<String>,
    /// Base URL of the Web API.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

/// How the subscriber interprets delivered payloads.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Decode a `NotificationMessage`, validate it and render mentions.
    Structured,
    /// Post the raw payload text to a fixed channel.
    Passthrough,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Structured => write!(f, "structured"),
            DeliveryMode::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// Configuration for the Lambda subscriber.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubscriberConfig {
    pub mode: DeliveryMode,
    /// Destination channel for passthrough mode.
    #[serde(default, deserialize_with = "lenient_string")]
    pub fallback_channel_id: Option<String>,
}

/// Configuration for the SNS publisher.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PublisherConfig {
    /// ARN of the topic to publish to.
    pub topic_arn: Option<String>,
    /// AWS region override. The SDK's default provider chain applies otherwise.
    pub region: Option<String>,
}

/// Environment values are parsed as typed values, so an all-digit ID
/// arrives as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
    }))
}

impl Config {
    /// Builds the layered figment without extracting it.
    ///
    /// Later layers win: defaults, then the TOML file, then the bare
    /// `SLACK_BOT_TOKEN` / `SLACK_CHANNEL_ID` / `SNS_TOPIC_ARN` variables,
    /// then `SNSRELAY_`-prefixed variables (`__` separates nested keys).
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::raw().filter_map(|key| {
                ENV_ALIASES
                    .iter()
                    .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                    .map(|(_, path)| (*path).into())
            }))
            // e.g. SNSRELAY_SUBSCRIBER__MODE=passthrough
            .merge(Env::prefixed("SNSRELAY_").split("__"))
    }

    /// Loads the configuration from defaults, file and environment.
    ///
    /// A missing file is not an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config: Config = Self::figment(config_path).extract()?;
        Ok(config)
    }

    /// Loads the configuration and applies command-line overrides on top.
    pub fn load_with_cli(cli: &Cli) -> Result<Self> {
        let config: Config = Self::figment(cli.config.as_deref())
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: "https://slack.com/api".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::Structured,
            fallback_channel_id: None,
        }
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            slack: SlackConfig::default(),
            subscriber: SubscriberConfig::default(),
            publisher: PublisherConfig::default(),
        }
    }
}
