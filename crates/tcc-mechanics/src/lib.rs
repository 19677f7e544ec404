//! Dice mechanics for Tabletop Control Center.
//!
//! Rolls standard and custom-sided dice with a flat modifier, and d20
//! advantage/disadvantage pairs. Results convert into the immutable
//! [`tcc_core::DiceRoll`] records kept in a campaign's history.

pub mod dice;
pub mod error;

pub use dice::{
    AdvantageMode, AdvantageRoll, DiceExpr, Die, MAX_DICE, StandardRoll, roll_advantage,
    roll_standard,
};
pub use error::{MechError, MechResult};
