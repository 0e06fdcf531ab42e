//! snsrelay publisher - publishes one notification to the relay topic.

use anyhow::{Context, Result};
use clap::Parser;
use snsrelay::{
    cli::Cli,
    config::Config,
    logging,
    publisher::{Publisher, SnsTopicPublisher},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_cli(&cli).context("failed to load configuration")?;
    logging::init(&config.log_level, config.log_format);

    let topic = config
        .publisher
        .topic_arn
        .clone()
        .filter(|t| !t.is_empty())
        .context("no topic configured; pass --topic or set SNS_TOPIC_ARN")?;

    let message = cli.notification();
    let publisher = Publisher::new(SnsTopicPublisher::from_env(config.publisher.region.clone()).await);
    publisher.publish(&topic, &message).await?;

    info!("Message successfully published to {}.", topic);
    Ok(())
}
