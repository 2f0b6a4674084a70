mod bot;
mod config;
mod moderation;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::Command;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sentinel_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Initializing Sentinel bot...");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    if !config_path.exists() {
        Config::write_default(&config_path)?;
        info!(
            "Created default config at {}, please fill it with correct values and restart me",
            config_path.display()
        );
        return Ok(());
    }

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Err(e) = config.validate() {
        info!(
            "Please check if you've changed default settings in {}: {}",
            config_path.display(),
            e
        );
        return Ok(());
    }

    info!("Chat username: {}", config.telegram.chat_handle());

    let bot = Bot::new(&config.telegram.bot_token);
    let me = bot.get_me().await.context("Failed to fetch bot identity")?;
    info!("Bot: @{0} <https://t.me/{0}>", me.username());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        error!("Failed to register bot commands: {}", e);
    }

    info!("Starting the mighty Sentinel bot!");
    bot::run(bot, Arc::new(config)).await;
    info!("Bot stopped");

    Ok(())
}
