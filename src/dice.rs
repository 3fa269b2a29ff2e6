//! Dice rolling system
//!
//! Parses and rolls dice notation like "2d6+3", "d20", "4d6-2"

use std::str::FromStr;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use thiserror::Error;

/// Upper bound on dice per roll, so a chat command can't ask for millions
pub const MAX_DICE: u32 = 1000;

/// Upper bound on sides per die, so totals stay within safe arithmetic
pub const MAX_SIDES: u32 = 1_000_000;

static MODIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[+-]\d+").unwrap());

/// Dice notation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("missing 'd' in dice notation")]
    MissingD,

    #[error("invalid dice count: {0}")]
    InvalidCount(String),

    #[error("dice count must be between 1 and {MAX_DICE}")]
    CountOutOfRange,

    #[error("invalid die sides: {0}")]
    InvalidSides(String),

    #[error("die sides must be between 1 and {MAX_SIDES}")]
    SidesOutOfRange,

    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
}

/// A parsed dice roll specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

impl DiceRoll {
    /// Create a new dice roll
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Roll and return individual die results plus total.
    ///
    /// The total is computed in i64: the capped dice sum always fits, and
    /// even an extreme i32 modifier can't wrap it.
    pub fn roll_detailed(&self) -> (Vec<u32>, i64) {
        let mut rng = rand::rng();
        let mut results = Vec::with_capacity(self.count as usize);

        for _ in 0..self.count {
            let roll = rng.random_range(1..=self.sides);
            results.push(roll);
        }

        let sum: i64 = results.iter().map(|&r| r as i64).sum();
        let total = sum + self.modifier as i64;

        (results, total)
    }
}

impl FromStr for DiceRoll {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Extract the first signed modifier term from a string.
///
/// Only the first `[+-]<digits>` match counts; later terms are ignored.
/// Returns 0 when no modifier is present; a matched term too large for
/// i32 is an error, not a silent 0.
pub fn first_modifier(s: &str) -> Result<i32, DiceError> {
    match MODIFIER_REGEX.find(s) {
        None => Ok(0),
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| DiceError::InvalidModifier(m.as_str().to_string())),
    }
}

/// Parse a dice notation string like "2d6+3"
///
/// Grammar: `[count]d<sides>[+-modifier...]`. The count defaults to 1 when
/// omitted ("d8" means "1d8"). The numeric modifier is the first signed term;
/// any further terms are consumed but ignored.
pub fn parse_dice(notation: &str) -> Result<DiceRoll, DiceError> {
    let notation = notation.trim().to_lowercase();

    let modifier = first_modifier(&notation)?;

    // Everything before the first +/- is the "<count>d<sides>" segment
    let dice_str = notation
        .split(['+', '-'])
        .next()
        .unwrap_or_default();

    let d_pos = dice_str.find('d').ok_or(DiceError::MissingD)?;

    let count_str = &dice_str[..d_pos];
    let count: u32 = if count_str.is_empty() {
        1 // "d6" means "1d6"
    } else {
        count_str
            .parse()
            .map_err(|_| DiceError::InvalidCount(count_str.to_string()))?
    };

    if count == 0 || count > MAX_DICE {
        return Err(DiceError::CountOutOfRange);
    }

    let sides_str = &dice_str[d_pos + 1..];
    let sides: u32 = sides_str
        .parse()
        .map_err(|_| DiceError::InvalidSides(sides_str.to_string()))?;

    if sides == 0 || sides > MAX_SIDES {
        return Err(DiceError::SidesOutOfRange);
    }

    Ok(DiceRoll {
        count,
        sides,
        modifier,
    })
}

/// Roll a single d20
pub fn roll_d20() -> u32 {
    rand::rng().random_range(1..=20)
}

/// Check if a d20 roll is a natural 20 (critical hit)
pub fn is_critical(roll: u32) -> bool {
    roll == 20
}

/// Check if a d20 roll is a natural 1 (critical fail)
pub fn is_fumble(roll: u32) -> bool {
    roll == 1
}
