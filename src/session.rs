//! Per-chat session state
//!
//! Tracks which game ruleset is active in each chat, so handlers can add
//! game-specific behavior (e.g. D&D critical hit lines). State lives in
//! memory only and is bound to the process lifetime.

use std::collections::HashMap;

/// A game ruleset the bot knows special behavior for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    /// Dungeons & Dragons: initiative rolls, natural 20/1 commentary
    DnD,
}

impl Game {
    /// Parse from string, case-insensitively
    pub fn from_str(s: &str) -> Option<Game> {
        match s.trim().to_uppercase().as_str() {
            "D&D" => Some(Game::DnD),
            _ => None,
        }
    }
}

/// Active-game state keyed by chat id
///
/// Owned by the bot and passed into handlers by reference; updates are
/// handled one at a time, so no locking is needed.
#[derive(Debug, Default)]
pub struct SessionStore {
    games: HashMap<i64, Game>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    /// Set the active game for a chat
    pub fn set(&mut self, chat_id: i64, game: Game) {
        self.games.insert(chat_id, game);
    }

    /// Clear any active game for a chat
    pub fn clear(&mut self, chat_id: i64) {
        self.games.remove(&chat_id);
    }

    /// Get the active game for a chat, if any
    pub fn active_game(&self, chat_id: i64) -> Option<Game> {
        self.games.get(&chat_id).copied()
    }
}
