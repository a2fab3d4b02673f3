mod bot;
mod config;
mod menu;
mod platform;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::Dispatcher;
use crate::config::{mask_token, Config};
use crate::platform::telegram::{self, TelegramSender};
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recovery_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Token: {}", mask_token(&config.telegram.bot_token));
    info!("  Bind address: {}", config.server.bind_address);
    info!("  Webhook path: {}", config.server.webhook_path);

    let bot = Bot::new(&config.telegram.bot_token);
    let bot_username = telegram::prepare(&bot, &config).await;
    info!(
        "  Bot username: {}",
        bot_username.as_deref().unwrap_or("<unknown>")
    );

    let sender = Arc::new(TelegramSender::new(bot));
    let state = Arc::new(AppState::new(Dispatcher::new(sender, bot_username)));

    info!("Bot is starting...");
    server::serve(&config, state).await?;

    Ok(())
}
