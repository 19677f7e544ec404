//! Dice roll records and the bounded roll history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of rolls kept in the history.
pub const HISTORY_CAPACITY: usize = 50;

/// How a roll was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollKind {
    /// `count` dice of one size plus a modifier.
    #[serde(rename = "standard")]
    Standard,
    /// Two d20, keep the higher.
    #[serde(rename = "adv")]
    Advantage,
    /// Two d20, keep the lower.
    #[serde(rename = "dis")]
    Disadvantage,
}

/// A single, immutable roll in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Millisecond timestamp id, strictly increasing within a history.
    pub id: u64,
    /// How the roll was made.
    #[serde(rename = "type")]
    pub kind: RollKind,
    /// Roll mode label carried by standard rolls (`"normal"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Number of sides on the die.
    pub die: u32,
    /// Number of dice rolled (1 for advantage/disadvantage).
    pub count: u32,
    /// Flat modifier added to the sum.
    #[serde(rename = "mod")]
    pub modifier: i32,
    /// Individual die values in the order rolled.
    pub rolls: Vec<u32>,
    /// Final result.
    pub total: i32,
    /// When the roll was made.
    pub timestamp: DateTime<Utc>,
}

impl DiceRoll {
    /// `+ 3` / `- 2` as shown after the dice.
    fn modifier_text(&self) -> String {
        let sign = if self.modifier >= 0 { '+' } else { '-' };
        format!("{sign} {}", self.modifier.unsigned_abs())
    }

    fn rolls_text(&self) -> String {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        values.join(", ")
    }

    /// Short line for history listings: `2d6 + 3 = 12` or `d20 Adv → 15`.
    pub fn summary(&self) -> String {
        match self.kind {
            RollKind::Standard => format!(
                "{}d{} {} = {}",
                self.count,
                self.die,
                self.modifier_text(),
                self.total
            ),
            RollKind::Advantage => format!("d20 Adv → {}", self.total),
            RollKind::Disadvantage => format!("d20 Dis → {}", self.total),
        }
    }
}

impl fmt::Display for DiceRoll {
    /// Full breakdown: `2d6 + 3 = [4, 5]` or `Advantage: [7, 15] → 15`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RollKind::Standard => write!(
                f,
                "{}d{} {} = [{}]",
                self.count,
                self.die,
                self.modifier_text(),
                self.rolls_text()
            ),
            RollKind::Advantage => {
                write!(f, "Advantage: [{}] → {}", self.rolls_text(), self.total)
            }
            RollKind::Disadvantage => {
                write!(f, "Disadvantage: [{}] → {}", self.rolls_text(), self.total)
            }
        }
    }
}

/// Most-recent-first list of rolls, capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiceHistory {
    entries: Vec<DiceRoll>,
}

impl DiceHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a roll, evicting the oldest past capacity.
    pub fn push(&mut self, roll: DiceRoll) {
        self.entries.insert(0, roll);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// The most recent roll.
    pub fn latest(&self) -> Option<&DiceRoll> {
        self.entries.first()
    }

    /// All rolls, most recent first.
    pub fn entries(&self) -> &[DiceRoll] {
        &self.entries
    }

    /// Number of rolls kept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no rolls are kept.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id for the next roll made at `now`: its millisecond timestamp, or one
    /// past the latest id if the clock has not moved on. Saturates at
    /// `u64::MAX`.
    pub fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        match self.latest() {
            Some(last) if last.id >= millis => last.id.saturating_add(1),
            _ => millis,
        }
    }
}
