//! Command routing and handlers
//!
//! Recognizes the bot's five command shapes:
//! - `/game <name>` — set up a game session for a chat
//! - `/epicquote` — random flavor quote
//! - `/coin` — coin toss
//! - `/ini name1,name2+2,...` — initiative order
//! - `/2d6+3` style dice notation — roll dice
//!
//! Handlers are pure text-in/text-out; all Telegram plumbing stays in the
//! update loop.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use tracing::debug;

use crate::dice::{self, DiceRoll};
use crate::initiative;
use crate::session::{Game, SessionStore};

/// Dice command shape: optional count, d/D, sides, optional signed modifiers
static DICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\d*[dD]\d+(?:[+-]?\d+)*$").unwrap());

const QUOTES: &[&str] = &[
    "If plan A didn't work, the alphabet has 25 more letters!",
    "Make my day, punk!",
    "I find your lack of faith disturbing.",
    "Are you talking to me?",
    "We are going to need a bigger boat...",
    "Here's Jooooohnny!",
    "It's a trap!!!",
    "One does not simply walk into Mordor...",
    "Ph'nglui mglw'nafh Cthulhu R'lyeh wgah'nagl fhtagn.",
];

const CRITICAL_LINES: &[&str] = &["Take that!!!", "Yippee-ki-yay!"];

const FAILURE_LINES: &[&str] = &["Ouch!!!", "I find your lack of luck disturbing."];

const GAME_HELP: &str = "I don't know that game, Professor Falken.\n\
    Fancy a game of chess?\n\
    Or try D&D.";

const DND_SETUP: &str = "D&D game setup. Special features:\n  \
    /ini player1,player2,player3+2,... -> roll for initiative\n  \
    /1d20 -> 20 - Critical, 1 - Failure";

const INI_USAGE: &str = "Usage: /ini player1,player2+2,orc1,...";

/// A recognized bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/game <name>` — set or clear the chat's game session
    Game(String),
    /// `/epicquote`
    EpicQuote,
    /// `/coin`
    Coin,
    /// `/ini <comma-separated list>`
    Initiative(String),
    /// Dice notation without the leading slash, e.g. "2d6+3"
    Roll(String),
}

impl Command {
    /// Match incoming text against the known command shapes.
    ///
    /// Commands may carry a `@bot_username` suffix (Telegram group
    /// convention); commands addressed to a different bot are ignored.
    /// Anything unrecognized returns `None`.
    pub fn parse(text: &str, bot_username: &str) -> Option<Command> {
        let text = text.trim();

        let (head, tail) = match text.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail.trim()),
            None => (text, ""),
        };

        let head = match head.split_once('@') {
            Some((command, target)) if target == bot_username => command,
            Some(_) => return None,
            None => head,
        };

        match head {
            "/game" => Some(Command::Game(tail.to_string())),
            "/epicquote" => Some(Command::EpicQuote),
            "/coin" => Some(Command::Coin),
            "/ini" => Some(Command::Initiative(tail.to_string())),
            _ if tail.is_empty() && DICE_REGEX.is_match(head) => {
                Some(Command::Roll(head[1..].to_string()))
            }
            _ => None,
        }
    }
}

/// Dispatch a parsed command, producing the reply text
pub fn handle(
    command: Command,
    chat_id: i64,
    from_name: &str,
    sessions: &mut SessionStore,
) -> String {
    match command {
        Command::Game(name) => setup_game(&name, chat_id, sessions),
        Command::EpicQuote => epic_quote(),
        Command::Coin => toss_coin(from_name),
        Command::Initiative(list) => roll_initiative(&list),
        Command::Roll(notation) => roll_dice(&notation, chat_id, from_name, sessions),
    }
}

/// Set up play session parameters for a chat.
///
/// A recognized game name activates its special features; anything else
/// clears the session and replies with a hint.
fn setup_game(name: &str, chat_id: i64, sessions: &mut SessionStore) -> String {
    match Game::from_str(name) {
        Some(game) => {
            sessions.set(chat_id, game);
            match game {
                Game::DnD => DND_SETUP.to_string(),
            }
        }
        None => {
            sessions.clear(chat_id);
            GAME_HELP.to_string()
        }
    }
}

/// Just some fun quotes to liven up the mood
fn epic_quote() -> String {
    pick(QUOTES).to_string()
}

/// Toss a coin
fn toss_coin(from_name: &str) -> String {
    let heads = rand::rng().random_range(1..=2) == 1;
    let face = if heads { "\u{2B55}" } else { "\u{274C}" };
    format!("{} - {}", from_name, face)
}

/// Roll for initiative
fn roll_initiative(list: &str) -> String {
    match initiative::roll_initiative(list) {
        Ok(reply) => reply,
        Err(initiative::InitiativeError::Empty) => INI_USAGE.to_string(),
        Err(e) => format!("invalid initiative list: {}", e),
    }
}

/// Decode and roll a dice expression, formatting the reply.
///
/// Malformed notation gets a user-visible error reply instead of a crash.
fn roll_dice(notation: &str, chat_id: i64, from_name: &str, sessions: &SessionStore) -> String {
    let spec: DiceRoll = match notation.parse() {
        Ok(spec) => spec,
        Err(e) => return format!("{} - invalid roll: {}", from_name, e),
    };

    debug!("Rolling {} for {}", spec, from_name);

    let (rolls, total) = spec.roll_detailed();

    let mut reply = format!("{} - {}", from_name, format_rolls(&rolls));

    // Single die with no modifier keeps the short form
    if rolls.len() > 1 || spec.modifier != 0 {
        if spec.modifier != 0 {
            reply.push_str(&format!(" {:+}", spec.modifier));
        }
        reply.push_str(&format!(" = {}", total));
    }

    if sessions.active_game(chat_id) == Some(Game::DnD) {
        reply.push_str(&dnd_extras(spec.count, spec.sides, &rolls));
    }

    reply
}

fn format_rolls(rolls: &[u32]) -> String {
    let parts: Vec<String> = rolls.iter().map(|r| r.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Special commentary when playing a D&D session.
///
/// Fires only for exactly one d20: a natural 20 celebrates, a natural 1
/// gets mocked. Everything else stays silent.
fn dnd_extras(count: u32, sides: u32, rolls: &[u32]) -> String {
    if count == 1 && sides == 20 {
        match rolls.first() {
            Some(&roll) if dice::is_critical(roll) => {
                return format!("\n{}", pick(CRITICAL_LINES));
            }
            Some(&roll) if dice::is_fumble(roll) => {
                return format!("\n{}", pick(FAILURE_LINES));
            }
            _ => {}
        }
    }

    String::new()
}

fn pick<'a>(lines: &[&'a str]) -> &'a str {
    lines[rand::rng().random_range(0..lines.len())]
}
