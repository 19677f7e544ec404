use std::fmt;

use serde::{Deserialize, Serialize};

use crate::nullable;

/// Which notes field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// Running session log.
    Session,
    /// Worldbuilding notes.
    World,
    /// House rules and rulings.
    Rules,
}

impl NoteKind {
    /// All note kinds in display order.
    pub const ALL: [NoteKind; 3] = [Self::Session, Self::World, Self::Rules];

    /// Parse a note kind by name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "session" => Some(Self::Session),
            "world" => Some(Self::World),
            "rules" | "rule" => Some(Self::Rules),
            _ => None,
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::World => write!(f, "world"),
            Self::Rules => write!(f, "rules"),
        }
    }
}

/// Three independent free-text notes fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notes {
    /// Session notes.
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub session: String,
    /// World notes.
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub world: String,
    /// Rules notes.
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub rules: String,
}

impl Notes {
    /// Get a notes field.
    pub fn get(&self, kind: NoteKind) -> &str {
        match kind {
            NoteKind::Session => &self.session,
            NoteKind::World => &self.world,
            NoteKind::Rules => &self.rules,
        }
    }

    /// Replace a notes field.
    pub fn set(&mut self, kind: NoteKind, text: impl Into<String>) {
        let slot = match kind {
            NoteKind::Session => &mut self.session,
            NoteKind::World => &mut self.world,
            NoteKind::Rules => &mut self.rules,
        };
        *slot = text.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut n = Notes::default();
        n.set(NoteKind::World, "The moon is hollow.");
        assert_eq!(n.get(NoteKind::World), "The moon is hollow.");
        assert_eq!(n.get(NoteKind::Session), "");
    }

    #[test]
    fn parse_kinds() {
        assert_eq!(NoteKind::parse("Session"), Some(NoteKind::Session));
        assert_eq!(NoteKind::parse("rule"), Some(NoteKind::Rules));
        assert_eq!(NoteKind::parse("lore"), None);
    }

    #[test]
    fn null_fields_deserialize_empty() {
        let n: Notes = serde_json::from_str(r#"{"session": null, "world": "w"}"#).unwrap();
        assert_eq!(n.session, "");
        assert_eq!(n.world, "w");
        assert_eq!(n.rules, "");
    }
}
