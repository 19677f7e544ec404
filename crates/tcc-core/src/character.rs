use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::nullable;

/// Level given to a new character when none (or garbage) was supplied.
pub const DEFAULT_LEVEL: i32 = 1;
/// Maximum hit points given to a new character when none was supplied.
pub const DEFAULT_MAX_HP: i32 = 10;
/// Starting value of every ability score.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;
/// Starting armor class.
pub const DEFAULT_ARMOR_CLASS: i32 = 10;
/// Starting walking speed in feet.
pub const DEFAULT_SPEED: i32 = 30;

/// Unique, time-ordered identifier of a character record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub String);

impl CharacterId {
    /// Generate a fresh identifier (`c` followed by a UUIDv7).
    pub fn new() -> Self {
        Self(format!("c{}", Uuid::now_v7().simple()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    /// Strength.
    Str,
    /// Dexterity.
    Dex,
    /// Constitution.
    Con,
    /// Intelligence.
    Int,
    /// Wisdom.
    Wis,
    /// Charisma.
    Cha,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    /// The lowercase key used in the stored document (`"str"`, `"dex"`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }

    /// The uppercase label shown on a sheet (`"STR"`, `"DEX"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }

    /// Parse an ability from its key or full name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Some(Self::Str),
            "dex" | "dexterity" => Some(Self::Dex),
            "con" | "constitution" => Some(Self::Con),
            "int" | "intelligence" => Some(Self::Int),
            "wis" | "wisdom" => Some(Self::Wis),
            "cha" | "charisma" => Some(Self::Cha),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six ability scores of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    /// Strength.
    pub str: i32,
    /// Dexterity.
    pub dex: i32,
    /// Constitution.
    pub con: i32,
    /// Intelligence.
    pub int: i32,
    /// Wisdom.
    pub wis: i32,
    /// Charisma.
    pub cha: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            str: DEFAULT_ABILITY_SCORE,
            dex: DEFAULT_ABILITY_SCORE,
            con: DEFAULT_ABILITY_SCORE,
            int: DEFAULT_ABILITY_SCORE,
            wis: DEFAULT_ABILITY_SCORE,
            cha: DEFAULT_ABILITY_SCORE,
        }
    }
}

impl AbilityScores {
    /// Get the score for an ability.
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    /// Set the score for an ability.
    pub fn set(&mut self, ability: Ability, value: i32) {
        let slot = match ability {
            Ability::Str => &mut self.str,
            Ability::Dex => &mut self.dex,
            Ability::Con => &mut self.con,
            Ability::Int => &mut self.int,
            Ability::Wis => &mut self.wis,
            Ability::Cha => &mut self.cha,
        };
        *slot = value;
    }

    /// The conventional modifier for an ability: `floor((score - 10) / 2)`.
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.get(ability) - 10).div_euclid(2)
    }
}

/// Current and maximum hit points. Neither value is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitPoints {
    /// Current hit points.
    pub current: i32,
    /// Maximum hit points.
    pub max: i32,
}

impl HitPoints {
    /// Full hit points at the given maximum.
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }
}

impl Default for HitPoints {
    fn default() -> Self {
        Self::full(DEFAULT_MAX_HP)
    }
}

impl fmt::Display for HitPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// One of a character's free-text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterText {
    /// Spells and abilities.
    Spells,
    /// Carried items.
    Inventory,
    /// Personal notes.
    Notes,
}

impl CharacterText {
    /// Parse a field name (`spells`, `inventory`, `notes`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spells" | "abilities" => Some(Self::Spells),
            "inventory" | "inv" => Some(Self::Inventory),
            "notes" | "note" => Some(Self::Notes),
            _ => None,
        }
    }
}

impl fmt::Display for CharacterText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spells => write!(f, "spells"),
            Self::Inventory => write!(f, "inventory"),
            Self::Notes => write!(f, "notes"),
        }
    }
}

/// A full character record in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    /// Unique identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Character class (free text, may be empty).
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub class: String,
    /// Character level.
    pub level: i32,
    /// Ability scores.
    pub stats: AbilityScores,
    /// Hit points.
    pub hp: HitPoints,
    /// Armor class.
    pub ac: i32,
    /// Walking speed in feet.
    pub speed: i32,
    /// Spells and abilities.
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub spells: String,
    /// Inventory.
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub inventory: String,
    /// Personal notes.
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub notes: String,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            id: CharacterId::new(),
            name: String::new(),
            class: String::new(),
            level: DEFAULT_LEVEL,
            stats: AbilityScores::default(),
            hp: HitPoints::default(),
            ac: DEFAULT_ARMOR_CLASS,
            speed: DEFAULT_SPEED,
            spells: String::new(),
            inventory: String::new(),
            notes: String::new(),
        }
    }
}

impl Character {
    /// Build a fresh character with default scores from creation inputs.
    ///
    /// Absent level and max HP fall back to [`DEFAULT_LEVEL`] and
    /// [`DEFAULT_MAX_HP`]. The name is taken as given; callers check it.
    pub fn new(input: NewCharacter) -> Self {
        let max_hp = input.max_hp.unwrap_or(DEFAULT_MAX_HP);
        Self {
            id: CharacterId::new(),
            name: input.name,
            class: input.class.unwrap_or_default(),
            level: input.level.unwrap_or(DEFAULT_LEVEL),
            hp: HitPoints::full(max_hp),
            ..Self::default()
        }
    }

    /// Get a free-text field.
    pub fn text(&self, field: CharacterText) -> &str {
        match field {
            CharacterText::Spells => &self.spells,
            CharacterText::Inventory => &self.inventory,
            CharacterText::Notes => &self.notes,
        }
    }

    /// Replace a free-text field.
    pub fn set_text(&mut self, field: CharacterText, text: impl Into<String>) {
        let slot = match field {
            CharacterText::Spells => &mut self.spells,
            CharacterText::Inventory => &mut self.inventory,
            CharacterText::Notes => &mut self.notes,
        };
        *slot = text.into();
    }

    /// One-line summary: `Wizard • Lv 3`.
    pub fn subtitle(&self) -> String {
        let class = if self.class.is_empty() {
            "Unknown class"
        } else {
            &self.class
        };
        format!("{class} • Lv {}", self.level)
    }
}

/// Inputs for creating a character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCharacter {
    /// Display name (must not be empty).
    pub name: String,
    /// Optional class.
    pub class: Option<String>,
    /// Optional level; defaults to 1.
    pub level: Option<i32>,
    /// Optional maximum HP; defaults to 10.
    pub max_hp: Option<i32>,
}

impl NewCharacter {
    /// Creation inputs with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Inputs for editing a character's name, class, and level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicsEdit {
    /// New name (must not be empty).
    pub name: String,
    /// New class, or `None` to keep the current one.
    pub class: Option<String>,
    /// New level, or `None` to keep the current one.
    pub level: Option<i32>,
}
