use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sms_bridge::{BridgeContext, Config, IncomingBroadcast, JsonLinesListener, SmsReceiver};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries events
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sms_bridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sms-bridge.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("  Decode failures: {}", config.receiver.decode_failure);
    info!("  Default format: {}", config.receiver.default_format);

    let receiver = SmsReceiver::from_config(&config.receiver);
    let context = BridgeContext::new();
    context.attach(Arc::new(JsonLinesListener::stdout(config.output.pretty)));

    info!("Reading broadcasts from stdin...");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read broadcast from stdin")?
    {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match IncomingBroadcast::from_json(&line) {
            Ok(payload) => receiver.on_broadcast(&payload, &context),
            Err(e) => warn!("Skipping malformed broadcast on line {}: {}", line_no, e),
        }
    }

    context.detach();

    info!("Input closed, {} lines processed", line_no);
    Ok(())
}
