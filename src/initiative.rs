//! Initiative roll resolver
//!
//! Takes a comma-separated list of participants like
//! "player1, player2+2, orc1, orc2+1", rolls a d20 for each (plus any
//! modifier), and renders the turn order from highest to lowest.

use thiserror::Error;

use crate::dice::{first_modifier, roll_d20, DiceError};

/// Initiative list errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitiativeError {
    #[error("no participants given")]
    Empty,

    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// A single participant in an initiative roll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Participant name, as typed (trimmed)
    pub name: String,
    /// Signed initiative modifier, 0 if absent
    pub modifier: i32,
}

/// Parse a comma-separated participant list.
///
/// Each entry is `name[+-modifier]`; the name is everything before the first
/// sign, trimmed. Empty entries are skipped; an unparseable modifier fails
/// the whole list.
pub fn parse_entries(list: &str) -> Result<Vec<Entry>, DiceError> {
    let mut entries = Vec::new();

    for raw in list.split(',') {
        let name = raw.split(['+', '-']).next().unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }
        entries.push(Entry {
            name: name.to_string(),
            modifier: first_modifier(raw)?,
        });
    }

    Ok(entries)
}

/// Render (name, total) pairs as a turn order, highest total first.
///
/// Entries with the same total collapse into one group, names joined with
/// "/" in encounter order. Groups are rendered as `names (total)` and
/// joined with ", ".
pub fn render_order(results: &[(String, i64)]) -> String {
    let mut groups: Vec<(i64, String)> = Vec::new();

    for (name, total) in results {
        if let Some((_, names)) = groups.iter_mut().find(|(t, _)| t == total) {
            names.push('/');
            names.push_str(name);
        } else {
            groups.push((*total, name.clone()));
        }
    }

    groups.sort_by(|a, b| b.0.cmp(&a.0));

    groups
        .iter()
        .map(|(total, names)| format!("{} ({})", names, total))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Roll initiative for a participant list, returning the rendered order.
pub fn roll_initiative(list: &str) -> Result<String, InitiativeError> {
    let entries = parse_entries(list)?;
    if entries.is_empty() {
        return Err(InitiativeError::Empty);
    }

    let results: Vec<(String, i64)> = entries
        .into_iter()
        .map(|entry| {
            let total = roll_d20() as i64 + entry.modifier as i64;
            (entry.name, total)
        })
        .collect();

    Ok(render_order(&results))
}
