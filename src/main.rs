//! Intake bot - conversational order intake over Telegram
//!
//! Walks each user through a short form, keeps one submission per user in a
//! JSON file, and gives a fixed set of operators commands to review and
//! delete submissions.

mod command;
mod config;
mod replies;
mod runtime;
mod state_machine;
mod store;
mod transport;
mod validation;

use config::BotConfig;
use runtime::BotRuntime;
use std::sync::Arc;
use store::JsonFileStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::TelegramTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = BotConfig::from_env()?;

    // Ensure the store directory exists
    if let Some(parent) = config.store_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let store = Arc::new(JsonFileStore::new(
        config.store_path.clone(),
        config.display_offset,
    ));
    tracing::info!(
        path = %store.path().display(),
        utc_offset = %config.display_offset,
        "Opened submission store"
    );

    let transport = Arc::new(TelegramTransport::new(
        &config.telegram_api_url,
        &config.telegram_token,
        config.poll_timeout,
    )?);

    if config.operators.is_empty() {
        tracing::warn!("No operators configured. Set INTAKE_OPERATOR_IDS to enable operator commands.");
    }

    let runtime = BotRuntime::new(store, transport, config.operators);

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown requested"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
        on_signal.cancel();
    });

    runtime.run(shutdown).await;
    Ok(())
}
