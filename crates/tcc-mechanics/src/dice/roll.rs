//! Rolling dice and turning the results into history records.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;

use tcc_core::{DiceRoll, RollKind};

use super::{DiceExpr, Die, MAX_DICE};
use crate::error::{MechError, MechResult};

/// Result of rolling `count` dice of one size plus a modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardRoll {
    /// The die rolled.
    pub die: Die,
    /// Number of dice rolled.
    pub count: u32,
    /// Flat modifier.
    pub modifier: i32,
    /// Individual values in the order rolled.
    pub rolls: Vec<u32>,
    /// Sum of the rolls plus the modifier.
    pub total: i32,
}

impl StandardRoll {
    /// Stamp the result into an immutable history record.
    pub fn into_entry(self, id: u64, timestamp: DateTime<Utc>) -> DiceRoll {
        DiceRoll {
            id,
            kind: RollKind::Standard,
            mode: Some("normal".to_string()),
            die: self.die.sides(),
            count: self.count,
            modifier: self.modifier,
            rolls: self.rolls,
            total: self.total,
            timestamp,
        }
    }
}

/// Which of two d20 to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvantageMode {
    /// Keep the higher roll.
    Advantage,
    /// Keep the lower roll.
    Disadvantage,
}

impl std::fmt::Display for AdvantageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Advantage => write!(f, "Advantage"),
            Self::Disadvantage => write!(f, "Disadvantage"),
        }
    }
}

/// Result of an advantage or disadvantage roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvantageRoll {
    /// Which value was kept.
    pub mode: AdvantageMode,
    /// Both d20 values, in the order rolled.
    pub rolls: [u32; 2],
    /// The kept value.
    pub kept: u32,
}

impl AdvantageRoll {
    /// Stamp the result into an immutable history record.
    pub fn into_entry(self, id: u64, timestamp: DateTime<Utc>) -> DiceRoll {
        let kind = match self.mode {
            AdvantageMode::Advantage => RollKind::Advantage,
            AdvantageMode::Disadvantage => RollKind::Disadvantage,
        };
        DiceRoll {
            id,
            kind,
            mode: None,
            die: Die::D20.sides(),
            count: 1,
            modifier: 0,
            rolls: self.rolls.to_vec(),
            total: i32::try_from(self.kept).unwrap_or(i32::MAX),
            timestamp,
        }
    }
}

/// Roll `expr.count` dice of `expr.die` and add `expr.modifier`.
pub fn roll_standard(rng: &mut StdRng, expr: DiceExpr) -> MechResult<StandardRoll> {
    let sides = expr.die.sides();
    if sides < 2 {
        return Err(MechError::InvalidDie(sides));
    }
    if expr.count == 0 || expr.count > MAX_DICE {
        return Err(MechError::InvalidCount(expr.count));
    }

    let rolls: Vec<u32> = (0..expr.count)
        .map(|_| rng.random_range(1..=sides))
        .collect();
    let sum: i64 = rolls.iter().map(|&v| i64::from(v)).sum();
    let total = i32::try_from(sum + i64::from(expr.modifier))
        .map_err(|_| MechError::TotalOutOfRange(expr.to_string()))?;

    Ok(StandardRoll {
        die: expr.die,
        count: expr.count,
        modifier: expr.modifier,
        rolls,
        total,
    })
}

/// Roll two d20 and keep the higher (advantage) or lower (disadvantage).
pub fn roll_advantage(rng: &mut StdRng, mode: AdvantageMode) -> AdvantageRoll {
    let first = rng.random_range(1..=20);
    let second = rng.random_range(1..=20);
    let kept = match mode {
        AdvantageMode::Advantage => first.max(second),
        AdvantageMode::Disadvantage => first.min(second),
    };
    AdvantageRoll {
        mode,
        rolls: [first, second],
        kept,
    }
}
