//! dicebot - Telegram dice bot daemon

use anyhow::Result;
use clap::Parser;
use dicebot::{Bot, Config, DEFAULT_API_URL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Telegram dice-rolling bot for RPG games
#[derive(Debug, Parser)]
#[command(name = "dicebot", version)]
struct Args {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: String,

    /// Bot API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Long-poll timeout in seconds
    #[arg(long, default_value_t = 30)]
    poll_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dicebot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = Config {
        token: args.token,
        api_url: args.api_url,
        poll_timeout: args.poll_timeout,
    };

    let mut bot = Bot::new(&config)?;
    bot.run().await
}
