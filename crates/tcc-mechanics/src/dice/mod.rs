//! Dice types, notation, and rolling.
//!
//! Supports the standard polyhedral set (d4 through d100) and custom dice
//! with any number of sides from 2 up.

pub mod roll;

pub use roll::{AdvantageMode, AdvantageRoll, StandardRoll, roll_advantage, roll_standard};

use crate::error::{MechError, MechResult};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// A die with `sides` sides. Fewer than two sides is an error.
    pub fn new(sides: u32) -> MechResult<Self> {
        match sides {
            4 => Ok(Self::D4),
            6 => Ok(Self::D6),
            8 => Ok(Self::D8),
            10 => Ok(Self::D10),
            12 => Ok(Self::D12),
            20 => Ok(Self::D20),
            100 => Ok(Self::D100),
            n if n >= 2 => Ok(Self::Custom(n)),
            n => Err(MechError::InvalidDie(n)),
        }
    }

    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Parse a die from a string like "d20", "d6", "d100".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let sides = s.strip_prefix('d')?.parse::<u32>().ok()?;
        Self::new(sides).ok()
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Most dice a single roll may use.
pub const MAX_DICE: u32 = 1000;

/// Dice notation: `count` dice of one size plus a flat modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    /// Number of dice, 1 to [`MAX_DICE`].
    pub count: u32,
    /// The die rolled.
    pub die: Die,
    /// Flat modifier added to the sum.
    pub modifier: i32,
}

impl DiceExpr {
    /// A single die with no modifier.
    pub fn single(die: Die) -> Self {
        Self {
            count: 1,
            die,
            modifier: 0,
        }
    }

    /// Parse notation such as `d20`, `3d6`, `2d8+1`, or `1d10 - 2`.
    pub fn parse(input: &str) -> MechResult<Self> {
        let invalid = || MechError::InvalidExpression(input.trim().to_string());
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        let (dice_part, modifier) = match compact.find(['+', '-']) {
            Some(pos) => {
                let digits = &compact[pos + 1..];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let magnitude: i32 = digits.parse().map_err(|_| invalid())?;
                let modifier = if compact[pos..].starts_with('-') {
                    -magnitude
                } else {
                    magnitude
                };
                (&compact[..pos], modifier)
            }
            None => (compact.as_str(), 0),
        };

        let (count_part, sides_part) = dice_part.split_once('d').ok_or_else(invalid)?;
        let count = if count_part.is_empty() {
            1
        } else {
            count_part.parse::<u32>().map_err(|_| invalid())?
        };
        if count == 0 || count > MAX_DICE {
            return Err(MechError::InvalidCount(count));
        }
        let sides = sides_part.parse::<u32>().map_err(|_| invalid())?;
        let die = Die::new(sides)?;

        Ok(Self {
            count,
            die,
            modifier,
        })
    }
}

impl std::fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.die)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}
