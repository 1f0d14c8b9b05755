use anyhow::Result;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{info, error};

mod bot;
mod commands;
mod config;
mod data;
mod handler;
mod leaderboard;
mod ledger;
mod registry;
mod ritual;
mod store;
mod utils;

#[cfg(test)]
mod test_support;

use bot::Bot;
use config::Config;
use handler::Handler;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging with environment-based configuration
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "buenos_dias_bot=info,serenity=warn".to_string())
        )
        .init();

    info!("Starting Buenos Dias Bot...");

    let config = Config::from_env()?;
    let store = store::open(&config.database_url).await?;
    let token = config.discord_token.clone();

    let handler = Handler {
        bot: Arc::new(Bot::new(config, store)),
    };

    let mut client = Client::builder(&token, Handler::intents())
        .event_handler(handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    info!("Bot initialized successfully, connecting to Discord...");

    if let Err(why) = client.start().await {
        error!("Discord client error: {}", why);
        return Err(anyhow::anyhow!("Discord client failed: {}", why));
    }

    Ok(())
}
