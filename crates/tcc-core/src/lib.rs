//! Core types for Tabletop Control Center.
//!
//! This crate defines the campaign document that every other crate mutates:
//! the character roster, the initiative tracker, free-text notes and the
//! dice roll history. It knows nothing about storage or randomness; you can
//! build a [`CampaignState`] programmatically or merge one from JSON.

/// Character records, ability scores, and hit points.
pub mod character;
/// Bounded, most-recent-first log of dice rolls.
pub mod dice_log;
/// Error types used throughout the crate.
pub mod error;
/// Turn-order tracker with a round counter and turn cursor.
pub mod initiative;
/// Session, world, and rules notes.
pub mod notes;
/// Roster operations on the campaign document.
pub mod roster;
/// The top-level campaign document and its shallow-merge policy.
pub mod state;

mod nullable;

/// Re-export character types.
pub use character::{
    Ability, AbilityScores, BasicsEdit, Character, CharacterId, CharacterText, HitPoints,
    NewCharacter,
};
/// Re-export dice log types.
pub use dice_log::{DiceHistory, DiceRoll, HISTORY_CAPACITY, RollKind};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export initiative types.
pub use initiative::{
    Combatant, CombatantEdit, CombatantId, CombatantKind, InitiativeTracker, NewCombatant,
    TurnAdvance,
};
/// Re-export notes types.
pub use notes::{NoteKind, Notes};
/// Re-export the campaign document.
pub use state::{CampaignState, DEFAULT_CAMPAIGN_NAME};
