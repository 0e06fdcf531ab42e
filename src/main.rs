//! snsrelay subscriber - Lambda entry point
//!
//! Receives SNS deliveries and posts each notification to Slack.

use anyhow::Result;
use aws_lambda_events::event::sns::SnsEvent;
use lambda_runtime::{service_fn, LambdaEvent};
use snsrelay::{
    config::Config,
    logging,
    notification::SlackClient,
    subscriber::{SubscriberHandler, SubscriberMode, SubscriberSettings},
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load(None).unwrap_or_else(|err| {
        logging::init("info", snsrelay::config::LogFormat::Text);
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    logging::init(&config.log_level, config.log_format);

    // Fail the cold start, not an invocation, when the credential is missing.
    let settings = SubscriberSettings::from_config(&config)?;

    info!("snsrelay subscriber starting up...");
    info!("Log Level: {}", config.log_level);
    info!("Delivery Mode: {}", config.subscriber.mode);
    if let SubscriberMode::Passthrough { channel_id } = &settings.mode {
        info!("Fallback Channel: {}", channel_id);
    }
    info!("Slack API: {}", config.slack.api_base_url);

    let slack = SlackClient::from_config(&config.slack, settings.bot_token.clone())?;
    let handler = Arc::new(SubscriberHandler::new(settings.mode, slack));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SnsEvent>| {
        let handler = Arc::clone(&handler);
        async move {
            let request_id = event.context.request_id.clone();
            info!(%request_id, records = event.payload.records.len(), "Invocation received.");
            handler
                .handle_event(&event.payload)
                .await
                .map(|_| ())
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
