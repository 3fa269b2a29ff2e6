//! dicebot - Telegram dice-rolling bot for RPG games
//!
//! Parses dice notation like "2d6+3" from chat commands and replies with
//! roll results, initiative orders, and assorted flavor text.

pub mod commands;
pub mod dice;
pub mod initiative;
pub mod session;
pub mod telegram;

use anyhow::Result;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use commands::Command;
use session::SessionStore;
use telegram::{TelegramClient, TelegramError, Update};

/// Default Bot API endpoint
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub token: String,
    /// Bot API base URL
    pub api_url: String,
    /// Long-poll timeout in seconds
    pub poll_timeout: u64,
}

impl Config {
    /// Create a config for the given token with default API settings
    pub fn new(token: String) -> Self {
        Self {
            token,
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout: 30,
        }
    }
}

/// The bot instance: update loop plus per-chat session state
pub struct Bot {
    client: TelegramClient,
    sessions: SessionStore,
}

impl Bot {
    /// Create a new bot instance
    pub fn new(config: &Config) -> Result<Self> {
        let client = TelegramClient::new(&config.token, &config.api_url, config.poll_timeout)?;

        Ok(Self {
            client,
            sessions: SessionStore::new(),
        })
    }

    /// Poll for updates and dispatch them, forever.
    ///
    /// Each update is handled to completion before the next; delivery
    /// errors are logged and the loop moves on.
    pub async fn run(&mut self) -> Result<()> {
        let me = self.client.get_me().await?;
        let username = me.username.unwrap_or(me.first_name);
        info!("dicebot running as @{}", username);

        let mut offset = 0i64;

        loop {
            let updates = match self.client.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("getUpdates failed: {}", e);
                    sleep(Duration::from_secs(3)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);

                if let Err(e) = self.handle_update(update, &username).await {
                    warn!("update caused error: {}", e);
                }
            }
        }
    }

    /// Handle one update: parse the command, run it, send the reply
    async fn handle_update(
        &mut self,
        update: Update,
        bot_username: &str,
    ) -> Result<(), TelegramError> {
        let Some(message) = update.message else {
            return Ok(());
        };
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let Some(command) = Command::parse(text, bot_username) else {
            return Ok(());
        };

        let from_name = message
            .from
            .as_ref()
            .map(|user| user.first_name.as_str())
            .unwrap_or("Someone");

        debug!("Handling {:?} in chat {}", command, message.chat.id);

        let reply = commands::handle(command, message.chat.id, from_name, &mut self.sessions);
        self.client.send_message(message.chat.id, &reply).await
    }
}
