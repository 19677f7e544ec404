//! Structured commands and the text syntax that produces them.
//!
//! A line is a command word, an optional sub-command, and arguments
//! separated by `|` so names may contain spaces:
//!
//! ```text
//! char add Aria | Wizard | 3 | 24
//! init add Goblin | 12 | 7 | enemy
//! char stat Aria | dex | 16
//! roll 3d6+2
//! ```
//!
//! Parsing validates every number before a command exists, so a command
//! that fails to parse never touches state.

use std::path::PathBuf;

use tcc_core::{
    Ability, BasicsEdit, CharacterText, CombatantEdit, CombatantKind, NewCharacter, NewCombatant,
    NoteKind,
};
use tcc_mechanics::{AdvantageMode, DiceExpr};

use crate::error::{SessionError, SessionResult};

/// One user action against the campaign.
///
/// Characters and combatants are named by `target`: an id, or a name
/// matched case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Rename the campaign.
    RenameCampaign {
        /// New name.
        name: String,
    },
    /// Create a character and select it.
    AddCharacter(NewCharacter),
    /// Change a character's name, class, and level.
    EditCharacter {
        /// Character id or name.
        target: String,
        /// New values.
        edit: BasicsEdit,
    },
    /// Delete a character. Needs confirmation.
    DeleteCharacter {
        /// Character id or name.
        target: String,
    },
    /// Select a character.
    SelectCharacter {
        /// Character id or name.
        target: String,
    },
    /// Set one ability score.
    SetStat {
        /// Character id or name.
        target: String,
        /// Which ability.
        ability: Ability,
        /// New score.
        value: i32,
    },
    /// Set current and maximum hit points.
    SetHp {
        /// Character id or name.
        target: String,
        /// Current hit points.
        current: i32,
        /// Maximum hit points.
        max: i32,
    },
    /// Set armor class.
    SetAc {
        /// Character id or name.
        target: String,
        /// New armor class.
        value: i32,
    },
    /// Set speed.
    SetSpeed {
        /// Character id or name.
        target: String,
        /// New speed.
        value: i32,
    },
    /// Replace spells, inventory, or personal notes.
    SetText {
        /// Character id or name.
        target: String,
        /// Which field.
        field: CharacterText,
        /// New text.
        text: String,
    },
    /// List the roster.
    ListCharacters,
    /// Show one character sheet; the selected one when `target` is `None`.
    ShowCharacter {
        /// Character id or name.
        target: Option<String>,
    },
    /// Append a combatant.
    AddCombatant(NewCombatant),
    /// Replace a combatant's fields in place.
    EditCombatant {
        /// Combatant id or name.
        target: String,
        /// New values.
        edit: CombatantEdit,
    },
    /// Remove a combatant. Needs confirmation.
    RemoveCombatant {
        /// Combatant id or name.
        target: String,
    },
    /// Sort combatants by descending initiative.
    SortInitiative,
    /// Advance to the next turn.
    NextTurn,
    /// Remove every combatant and reset the round. Needs confirmation.
    ClearInitiative,
    /// Add `delta` to a combatant's hit points.
    AdjustHp {
        /// Combatant id or name.
        target: String,
        /// Signed change.
        delta: i32,
    },
    /// Show the turn order.
    ListInitiative,
    /// Roll dice notation.
    Roll(DiceExpr),
    /// Roll two d20 and keep one.
    RollD20(AdvantageMode),
    /// Show recent rolls.
    History,
    /// Replace one notes field.
    SetNote {
        /// Which notes.
        kind: NoteKind,
        /// New text.
        text: String,
    },
    /// Show notes; all of them when `kind` is `None`.
    ShowNotes {
        /// Which notes.
        kind: Option<NoteKind>,
    },
    /// Write the document to a file; a generated name when `path` is `None`.
    Export {
        /// Destination file.
        path: Option<PathBuf>,
    },
    /// Merge a JSON document over the current state.
    Import {
        /// Source file.
        path: PathBuf,
    },
    /// Restore defaults. Needs confirmation.
    Reset,
    /// Campaign overview.
    Status,
    /// Help text, optionally for one topic.
    Help {
        /// Topic name.
        topic: String,
    },
}

impl Command {
    /// Whether this command must be confirmed before it runs.
    pub fn requires_confirmation(&self) -> bool {
        matches!(
            self,
            Self::DeleteCharacter { .. }
                | Self::RemoveCombatant { .. }
                | Self::ClearInitiative
                | Self::Reset
        )
    }

    /// Parse a line of input.
    pub fn parse(input: &str) -> SessionResult<Self> {
        let trimmed = input.trim();
        let (word, rest) = split_word(trimmed);

        match word.to_lowercase().as_str() {
            "campaign" => {
                if rest.is_empty() {
                    return Err(SessionError::Usage("campaign <name>"));
                }
                Ok(Self::RenameCampaign {
                    name: rest.to_string(),
                })
            }
            "char" | "character" => parse_character(rest),
            "chars" | "characters" => Ok(Self::ListCharacters),
            "init" | "initiative" => parse_initiative(rest),
            "next" => Ok(Self::NextTurn),
            "roll" | "r" => {
                if rest.is_empty() {
                    return Err(SessionError::Usage("roll <dice>, e.g. roll 3d6+2"));
                }
                Ok(Self::Roll(DiceExpr::parse(rest)?))
            }
            "adv" | "advantage" => Ok(Self::RollD20(AdvantageMode::Advantage)),
            "dis" | "disadvantage" => Ok(Self::RollD20(AdvantageMode::Disadvantage)),
            "history" => Ok(Self::History),
            "notes" | "note" => parse_notes(rest),
            "export" => Ok(Self::Export {
                path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
            }),
            "import" => {
                if rest.is_empty() {
                    return Err(SessionError::Usage("import <file>"));
                }
                Ok(Self::Import {
                    path: PathBuf::from(rest),
                })
            }
            "reset" => Ok(Self::Reset),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help {
                topic: rest.to_string(),
            }),
            _ => Err(SessionError::UnknownCommand(trimmed.to_string())),
        }
    }
}

/// Parse an integer input. Surrounding whitespace is allowed, nothing else.
pub fn parse_int(field: &'static str, raw: &str) -> SessionResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| SessionError::InvalidNumber {
            field,
            value: raw.trim().to_string(),
        })
}

/// Parse an optional integer input where blank or unparseable means absent.
pub fn parse_lenient(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
}

/// Parse an ability key.
pub fn parse_ability(raw: &str) -> SessionResult<Ability> {
    Ability::parse(raw).ok_or_else(|| SessionError::UnknownAbility(raw.trim().to_string()))
}

/// Parse a character text field name.
pub fn parse_text_field(raw: &str) -> SessionResult<CharacterText> {
    CharacterText::parse(raw).ok_or_else(|| SessionError::UnknownTextField(raw.trim().to_string()))
}

/// Parse a notes field name.
pub fn parse_note_kind(raw: &str) -> SessionResult<NoteKind> {
    NoteKind::parse(raw).ok_or_else(|| SessionError::UnknownNoteKind(raw.trim().to_string()))
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

/// Split `a | b | c` into trimmed fields. Blank input yields no fields.
fn fields(input: &str) -> Vec<&str> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split('|').map(str::trim).collect()
}

/// A non-blank optional field.
fn optional<'a>(parts: &[&'a str], index: usize) -> Option<&'a str> {
    parts.get(index).copied().filter(|s| !s.is_empty())
}

fn required_target(parts: &[&str], usage: &'static str) -> SessionResult<String> {
    optional(parts, 0)
        .map(str::to_string)
        .ok_or(SessionError::Usage(usage))
}

fn parse_character(rest: &str) -> SessionResult<Command> {
    let (sub, args) = split_word(rest);
    let parts = fields(args);

    match sub.to_lowercase().as_str() {
        "add" => {
            let name = optional(&parts, 0)
                .ok_or(SessionError::Usage("char add <name> [| class | level | max hp]"))?;
            Ok(Command::AddCharacter(NewCharacter {
                name: name.to_string(),
                class: optional(&parts, 1).map(str::to_string),
                level: parse_lenient(optional(&parts, 2)),
                max_hp: parse_lenient(optional(&parts, 3)),
            }))
        }
        "edit" => {
            let usage = "char edit <who> | <name> [| class | level]";
            let target = required_target(&parts, usage)?;
            let name = parts.get(1).ok_or(SessionError::Usage(usage))?;
            Ok(Command::EditCharacter {
                target,
                edit: BasicsEdit {
                    name: name.to_string(),
                    class: parts.get(2).map(|s| s.to_string()),
                    level: parse_lenient(optional(&parts, 3)),
                },
            })
        }
        "delete" | "del" | "rm" => Ok(Command::DeleteCharacter {
            target: required_target(&parts, "char delete <who>")?,
        }),
        "select" | "use" => Ok(Command::SelectCharacter {
            target: required_target(&parts, "char select <who>")?,
        }),
        "stat" => {
            let usage = "char stat <who> | <ability> | <score>";
            let target = required_target(&parts, usage)?;
            let (Some(ability), Some(value)) = (parts.get(1), parts.get(2)) else {
                return Err(SessionError::Usage(usage));
            };
            Ok(Command::SetStat {
                target,
                ability: parse_ability(ability)?,
                value: parse_int("score", value)?,
            })
        }
        "hp" => {
            let usage = "char hp <who> | <current> | <max>";
            let target = required_target(&parts, usage)?;
            let (Some(current), Some(max)) = (parts.get(1), parts.get(2)) else {
                return Err(SessionError::Usage(usage));
            };
            Ok(Command::SetHp {
                target,
                current: parse_int("current HP", current)?,
                max: parse_int("max HP", max)?,
            })
        }
        "ac" => {
            let usage = "char ac <who> | <value>";
            let target = required_target(&parts, usage)?;
            let value = parts.get(1).ok_or(SessionError::Usage(usage))?;
            Ok(Command::SetAc {
                target,
                value: parse_int("AC", value)?,
            })
        }
        "speed" => {
            let usage = "char speed <who> | <value>";
            let target = required_target(&parts, usage)?;
            let value = parts.get(1).ok_or(SessionError::Usage(usage))?;
            Ok(Command::SetSpeed {
                target,
                value: parse_int("speed", value)?,
            })
        }
        "text" => {
            let usage = "char text <who> | <spells|inventory|notes> | <text>";
            let target = required_target(&parts, usage)?;
            let field = parts.get(1).ok_or(SessionError::Usage(usage))?;
            let field = parse_text_field(field)?;
            // The text itself may contain `|`.
            let text = args
                .splitn(3, '|')
                .nth(2)
                .map(str::trim)
                .unwrap_or_default();
            Ok(Command::SetText {
                target,
                field,
                text: text.to_string(),
            })
        }
        "list" | "ls" | "" => Ok(Command::ListCharacters),
        "show" => Ok(Command::ShowCharacter {
            target: optional(&parts, 0).map(str::to_string),
        }),
        other => Err(SessionError::UnknownCommand(format!("char {other}"))),
    }
}

fn parse_combatant(parts: &[&str], offset: usize, usage: &'static str) -> SessionResult<NewCombatant> {
    let name = parts.get(offset).ok_or(SessionError::Usage(usage))?;
    let initiative = parts.get(offset + 1).ok_or(SessionError::Usage(usage))?;
    Ok(NewCombatant {
        name: name.to_string(),
        initiative: parse_int("initiative", initiative)?,
        hp: parse_lenient(optional(parts, offset + 2)),
        kind: optional(parts, offset + 3)
            .map(CombatantKind::from)
            .unwrap_or_default(),
    })
}

fn parse_initiative(rest: &str) -> SessionResult<Command> {
    let (sub, args) = split_word(rest);
    let parts = fields(args);

    match sub.to_lowercase().as_str() {
        "add" => Ok(Command::AddCombatant(parse_combatant(
            &parts,
            0,
            "init add <name> | <initiative> [| hp | type]",
        )?)),
        "edit" => {
            let usage = "init edit <who> | <name> | <initiative> [| hp | type]";
            let target = required_target(&parts, usage)?;
            let combatant = parse_combatant(&parts, 1, usage)?;
            Ok(Command::EditCombatant {
                target,
                edit: CombatantEdit {
                    name: combatant.name,
                    initiative: combatant.initiative,
                    hp: combatant.hp,
                    kind: optional(&parts, 4).map(CombatantKind::from),
                },
            })
        }
        "remove" | "rm" => Ok(Command::RemoveCombatant {
            target: required_target(&parts, "init remove <who>")?,
        }),
        "sort" => Ok(Command::SortInitiative),
        "next" => Ok(Command::NextTurn),
        "clear" => Ok(Command::ClearInitiative),
        "hp" => {
            let usage = "init hp <who> | <delta>";
            let target = required_target(&parts, usage)?;
            let delta = parts.get(1).ok_or(SessionError::Usage(usage))?;
            Ok(Command::AdjustHp {
                target,
                delta: parse_int("HP change", delta)?,
            })
        }
        "list" | "ls" | "" => Ok(Command::ListInitiative),
        other => Err(SessionError::UnknownCommand(format!("init {other}"))),
    }
}

fn parse_notes(rest: &str) -> SessionResult<Command> {
    let (sub, args) = split_word(rest);
    match sub.to_lowercase().as_str() {
        "set" => {
            let (kind, text) = args
                .split_once('|')
                .ok_or(SessionError::Usage("notes set <session|world|rules> | <text>"))?;
            Ok(Command::SetNote {
                kind: parse_note_kind(kind)?,
                text: text.trim().to_string(),
            })
        }
        "show" => Ok(Command::ShowNotes {
            kind: (!args.is_empty()).then(|| parse_note_kind(args)).transpose()?,
        }),
        "" => Ok(Command::ShowNotes { kind: None }),
        other => Ok(Command::ShowNotes {
            kind: Some(parse_note_kind(other)?),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcc_mechanics::Die;

    #[test]
    fn parse_add_character_full() {
        let cmd = Command::parse("char add Aria Moonwhisper | Wizard | 3 | 24").unwrap();
        let Command::AddCharacter(input) = cmd else {
            panic!("expected AddCharacter");
        };
        assert_eq!(input.name, "Aria Moonwhisper");
        assert_eq!(input.class.as_deref(), Some("Wizard"));
        assert_eq!(input.level, Some(3));
        assert_eq!(input.max_hp, Some(24));
    }

    #[test]
    fn parse_add_character_lenient_numbers() {
        let Command::AddCharacter(input) = Command::parse("char add Brom | | x | ").unwrap() else {
            panic!("expected AddCharacter");
        };
        assert_eq!(input.class, None);
        assert_eq!(input.level, None);
        assert_eq!(input.max_hp, None);
    }

    #[test]
    fn parse_edit_keeps_class_when_missing() {
        let cmd = Command::parse("char edit Aria | Aria the Bold").unwrap();
        let Command::EditCharacter { target, edit } = cmd else {
            panic!("expected EditCharacter");
        };
        assert_eq!(target, "Aria");
        assert_eq!(edit.name, "Aria the Bold");
        assert_eq!(edit.class, None);
        assert_eq!(edit.level, None);
    }

    #[test]
    fn parse_stat_requires_number() {
        let err = Command::parse("char stat Aria | dex | sixteen").unwrap_err();
        assert_eq!(err.to_string(), "score must be a number, got \"sixteen\"");
        assert!(matches!(
            Command::parse("char stat Aria | luck | 3"),
            Err(SessionError::UnknownAbility(_))
        ));
        assert_eq!(
            Command::parse("char stat Aria | DEX | 16").unwrap(),
            Command::SetStat {
                target: "Aria".to_string(),
                ability: Ability::Dex,
                value: 16
            }
        );
    }

    #[test]
    fn parse_hp_and_ac() {
        assert_eq!(
            Command::parse("char hp Aria | 5 | 24").unwrap(),
            Command::SetHp {
                target: "Aria".to_string(),
                current: 5,
                max: 24
            }
        );
        assert!(matches!(
            Command::parse("char ac Aria | 1.5"),
            Err(SessionError::InvalidNumber { field: "AC", .. })
        ));
        assert!(matches!(
            Command::parse("char hp Aria | 5"),
            Err(SessionError::Usage(_))
        ));
    }

    #[test]
    fn parse_text_keeps_pipes_in_body() {
        let cmd = Command::parse("char text Aria | inventory | rope | torch").unwrap();
        assert_eq!(
            cmd,
            Command::SetText {
                target: "Aria".to_string(),
                field: CharacterText::Inventory,
                text: "rope | torch".to_string()
            }
        );
    }

    #[test]
    fn parse_combatants() {
        let cmd = Command::parse("init add Goblin Boss | 14 | 21 | enemy").unwrap();
        let Command::AddCombatant(c) = cmd else {
            panic!("expected AddCombatant");
        };
        assert_eq!(c.name, "Goblin Boss");
        assert_eq!(c.initiative, 14);
        assert_eq!(c.hp, Some(21));
        assert_eq!(c.kind, CombatantKind::Enemy);

        let Command::AddCombatant(c) = Command::parse("init add Aria | 9").unwrap() else {
            panic!("expected AddCombatant");
        };
        assert_eq!(c.hp, None);
        assert_eq!(c.kind, CombatantKind::Pc);

        assert!(matches!(
            Command::parse("init add Aria | fast"),
            Err(SessionError::InvalidNumber { field: "initiative", .. })
        ));
    }

    #[test]
    fn parse_combatant_edit_and_hp() {
        let cmd = Command::parse("init edit Goblin | Hobgoblin | 11 | 15 | boss").unwrap();
        let Command::EditCombatant { target, edit } = cmd else {
            panic!("expected EditCombatant");
        };
        assert_eq!(target, "Goblin");
        assert_eq!(edit.name, "Hobgoblin");
        assert_eq!(edit.hp, Some(15));
        assert_eq!(edit.kind, Some(CombatantKind::Other("boss".to_string())));

        let Command::EditCombatant { edit, .. } =
            Command::parse("init edit Goblin | Goblin | 15").unwrap()
        else {
            panic!("expected EditCombatant");
        };
        assert_eq!(edit.initiative, 15);
        assert_eq!(edit.hp, None);
        assert_eq!(edit.kind, None);

        assert_eq!(
            Command::parse("init hp Goblin | -4").unwrap(),
            Command::AdjustHp {
                target: "Goblin".to_string(),
                delta: -4
            }
        );
    }

    #[test]
    fn parse_dice() {
        assert_eq!(
            Command::parse("roll 2d6+3").unwrap(),
            Command::Roll(DiceExpr {
                count: 2,
                die: Die::D6,
                modifier: 3
            })
        );
        assert_eq!(
            Command::parse("adv").unwrap(),
            Command::RollD20(AdvantageMode::Advantage)
        );
        assert!(matches!(
            Command::parse("roll lots"),
            Err(SessionError::Dice(_))
        ));
    }

    #[test]
    fn parse_notes_forms() {
        assert_eq!(
            Command::parse("notes set world | The moon is hollow").unwrap(),
            Command::SetNote {
                kind: NoteKind::World,
                text: "The moon is hollow".to_string()
            }
        );
        assert_eq!(
            Command::parse("notes").unwrap(),
            Command::ShowNotes { kind: None }
        );
        assert_eq!(
            Command::parse("notes rules").unwrap(),
            Command::ShowNotes {
                kind: Some(NoteKind::Rules)
            }
        );
        assert!(Command::parse("notes lore").is_err());
    }

    #[test]
    fn confirmation_required_for_destructive() {
        assert!(Command::parse("char delete Aria").unwrap().requires_confirmation());
        assert!(Command::parse("init remove Goblin").unwrap().requires_confirmation());
        assert!(Command::parse("init clear").unwrap().requires_confirmation());
        assert!(Command::parse("reset").unwrap().requires_confirmation());
        assert!(!Command::parse("init next").unwrap().requires_confirmation());
    }

    #[test]
    fn unknown_commands() {
        assert!(matches!(
            Command::parse("dance"),
            Err(SessionError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("char fly Aria"),
            Err(SessionError::UnknownCommand(_))
        ));
    }
}
