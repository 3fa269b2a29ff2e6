//! End-to-end command tests
//!
//! Drives the router the same way the update loop does: raw message text
//! in, reply text out, with a real session store in between. No network.

use dicebot::commands::{self, Command};
use dicebot::session::{Game, SessionStore};

const BOT: &str = "RollBot";

/// Parse and handle one message, as the update loop would
fn exchange(text: &str, chat_id: i64, from: &str, sessions: &mut SessionStore) -> Option<String> {
    let command = Command::parse(text, BOT)?;
    Some(commands::handle(command, chat_id, from, sessions))
}

#[test]
fn test_game_setup_flow() {
    let mut sessions = SessionStore::new();

    // Any-case "d&d" activates the session
    let reply = exchange("/game D&d", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("D&D game setup"));
    assert!(reply.contains("/ini"));
    assert_eq!(sessions.active_game(1), Some(Game::DnD));

    // Unknown game clears it and replies with guidance
    let reply = exchange("/game chess", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("I don't know that game"));
    assert_eq!(sessions.active_game(1), None);
}

#[test]
fn test_game_sessions_are_per_chat() {
    let mut sessions = SessionStore::new();

    exchange("/game d&d", 1, "Alice", &mut sessions).unwrap();
    assert_eq!(sessions.active_game(1), Some(Game::DnD));
    assert_eq!(sessions.active_game(2), None);
}

#[test]
fn test_roll_reply_shapes() {
    let mut sessions = SessionStore::new();

    // d1 rolls are deterministic: single die, zero modifier -> short form
    let reply = exchange("/d1", 1, "Alice", &mut sessions).unwrap();
    assert_eq!(reply, "Alice - [1]");

    // Multiple dice include the total
    let reply = exchange("/3d1", 1, "Alice", &mut sessions).unwrap();
    assert_eq!(reply, "Alice - [1, 1, 1] = 3");

    // Nonzero modifier shows up signed, with the total
    let reply = exchange("/2d1+4", 1, "Alice", &mut sessions).unwrap();
    assert_eq!(reply, "Alice - [1, 1] +4 = 6");

    let reply = exchange("/d1-2", 1, "Bob", &mut sessions).unwrap();
    assert_eq!(reply, "Bob - [1] -2 = -1");
}

#[test]
fn test_roll_bounds_over_many_rolls() {
    let mut sessions = SessionStore::new();

    for _ in 0..100 {
        let reply = exchange("/2d6", 1, "Alice", &mut sessions).unwrap();

        // "Alice - [a, b] = t"
        let total: i32 = reply.rsplit(" = ").next().unwrap().parse().unwrap();
        assert!((2..=12).contains(&total), "total out of range: {}", reply);
    }
}

#[test]
fn test_malformed_roll_gets_error_reply() {
    let mut sessions = SessionStore::new();

    let reply = exchange("/2d0", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("invalid roll"), "got: {}", reply);

    let reply = exchange("/0d6", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("invalid roll"), "got: {}", reply);
}

#[test]
fn test_huge_rolls_get_error_reply_not_crash() {
    let mut sessions = SessionStore::new();

    // u32-sized sides once overflowed the dice sum in roll_detailed
    let reply = exchange("/1000d4294967295", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("invalid roll"), "got: {}", reply);

    // A single huge die once produced a negative total
    let reply = exchange("/d4294967295+1", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("invalid roll"), "got: {}", reply);

    // A modifier beyond i32 was silently dropped to 0
    let reply = exchange("/d20+99999999999", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("invalid roll"), "got: {}", reply);

    let reply = exchange("/ini orc+99999999999", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.contains("invalid initiative list"), "got: {}", reply);
}

#[test]
fn test_d20_extras_only_in_dnd_session() {
    let mut sessions = SessionStore::new();

    // Without a session, a d20 reply is always a single line
    for _ in 0..50 {
        let reply = exchange("/d20", 1, "Alice", &mut sessions).unwrap();
        assert!(!reply.contains('\n'), "unexpected extra: {}", reply);
    }

    // In a D&D session, extras appear exactly on natural 20s and 1s
    exchange("/game d&d", 1, "Alice", &mut sessions).unwrap();
    for _ in 0..200 {
        let reply = exchange("/d20", 1, "Alice", &mut sessions).unwrap();

        let first_line = reply.lines().next().unwrap();
        let roll: u32 = first_line
            .trim_start_matches("Alice - [")
            .trim_end_matches(']')
            .parse()
            .unwrap();

        let has_extra = reply.contains('\n');
        assert_eq!(has_extra, roll == 20 || roll == 1, "reply: {}", reply);
    }
}

#[test]
fn test_multi_die_d20_never_gets_extras() {
    let mut sessions = SessionStore::new();
    exchange("/game d&d", 1, "Alice", &mut sessions).unwrap();

    for _ in 0..100 {
        let reply = exchange("/2d20", 1, "Alice", &mut sessions).unwrap();
        assert!(!reply.contains('\n'), "unexpected extra: {}", reply);
    }
}

#[test]
fn test_initiative_reply() {
    let mut sessions = SessionStore::new();

    let reply = exchange("/ini aragorn, legolas+2, gimli-1", 1, "Alice", &mut sessions).unwrap();

    // Every participant appears exactly once
    for name in ["aragorn", "legolas", "gimli"] {
        assert_eq!(reply.matches(name).count(), 1, "reply: {}", reply);
    }

    // Totals are sorted descending
    let totals: Vec<i32> = reply
        .split(", ")
        .map(|group| {
            group
                .rsplit('(')
                .next()
                .unwrap()
                .trim_end_matches(')')
                .parse()
                .unwrap()
        })
        .collect();
    let mut sorted = totals.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(totals, sorted, "reply: {}", reply);

    assert!(!reply.ends_with(", "));
}

#[test]
fn test_initiative_empty_list() {
    let mut sessions = SessionStore::new();

    let reply = exchange("/ini", 1, "Alice", &mut sessions).unwrap();
    assert!(reply.starts_with("Usage:"), "got: {}", reply);
}

#[test]
fn test_coin_toss() {
    let mut sessions = SessionStore::new();

    let reply = exchange("/coin", 1, "Carol", &mut sessions).unwrap();
    assert!(reply == "Carol - \u{2B55}" || reply == "Carol - \u{274C}");
}

#[test]
fn test_unrecognized_text_is_ignored() {
    let mut sessions = SessionStore::new();

    assert!(exchange("hello", 1, "Alice", &mut sessions).is_none());
    assert!(exchange("/unknown", 1, "Alice", &mut sessions).is_none());
    assert!(exchange("/coin@OtherBot", 1, "Alice", &mut sessions).is_none());
}
