//! Telegram Bot API integration
//!
//! Provides:
//! - Update delivery via long polling (getUpdates)
//! - Plain-text replies (sendMessage)
//! - Bot identity lookup (getMe)
//!
//! Only the handful of API fields the bot actually reads are modeled.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Telegram API errors
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("empty API result")]
    EmptyResult,
}

/// An incoming update from getUpdates
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// A chat message
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub text: Option<String>,
    pub chat: Chat,
    pub from: Option<User>,
}

/// The chat a message belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A Telegram user (also the bot itself, via getMe)
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Envelope every Bot API response arrives in
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Minimal Telegram Bot API client
#[derive(Debug)]
pub struct TelegramClient {
    /// HTTP client
    client: Client,
    /// Per-bot API base, e.g. "https://api.telegram.org/bot<token>"
    base_url: String,
    /// Long-poll timeout in seconds
    poll_timeout: u64,
}

impl TelegramClient {
    /// Create a new client for the given bot token
    pub fn new(token: &str, api_url: &str, poll_timeout: u64) -> Result<Self, TelegramError> {
        // Request timeout must outlast the server-side long poll
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout + 10))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            poll_timeout,
        })
    }

    /// Fetch the bot's own identity
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates with ids >= offset
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout,
        };
        self.call("getUpdates", &request).await
    }

    /// Send a plain-text message to a chat.
    ///
    /// Replies are standalone messages; the triggering message is never
    /// quoted.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let request = SendMessageRequest { chat_id, text };
        // Discard the echoed Message, only delivery matters
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    /// POST a Bot API method and unwrap the response envelope
    async fn call<R, T>(&self, method: &str, body: &R) -> Result<T, TelegramError>
    where
        R: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Calling Telegram API method {}", method);

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Telegram API error: {} - {}", status, body);
            return Err(TelegramError::Api(status.to_string()));
        }

        let envelope: ApiResponse<T> = response.json().await?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(TelegramError::Api(description));
        }

        envelope.result.ok_or(TelegramError::EmptyResult)
    }
}
