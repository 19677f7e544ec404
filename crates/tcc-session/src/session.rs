//! Campaign session management.
//!
//! `CampaignSession` owns the campaign document, the store it is flushed
//! to, and the dice RNG. Every successful mutation saves the whole
//! document. Text input goes through [`CampaignSession::process`], which
//! holds destructive commands until the next line confirms them.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;

use tcc_core::{
    Ability, BasicsEdit, CampaignState, Character, CharacterId, CharacterText, Combatant,
    CombatantEdit, CombatantId, DiceRoll, NewCharacter, NewCombatant, NoteKind, RollKind,
    TurnAdvance,
};
use tcc_mechanics::{AdvantageMode, DiceExpr, Die, roll_advantage, roll_standard};

use crate::command::Command;
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::persistence::{ExportedDocument, export_document, load_state, save_state};
use crate::store::KeyValueStore;

/// An interactive campaign session over a key-value store.
pub struct CampaignSession<S: KeyValueStore> {
    state: CampaignState,
    store: S,
    config: SessionConfig,
    rng: StdRng,
    pending: Option<Command>,
}

impl<S: KeyValueStore> CampaignSession<S> {
    /// Open a session, loading whatever the store holds under the
    /// configured key.
    pub fn new(store: S, config: SessionConfig) -> Self {
        let state = load_state(&store, &config.storage_key);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            state,
            store,
            config,
            rng,
            pending: None,
        }
    }

    /// Get the campaign document.
    pub fn state(&self) -> &CampaignState {
        &self.state
    }

    /// Get the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The command waiting for confirmation, if any.
    pub fn pending(&self) -> Option<&Command> {
        self.pending.as_ref()
    }

    fn save(&mut self) {
        save_state(&mut self.store, &self.config.storage_key, &self.state);
    }

    /// Resolve a character by id or case-insensitive name.
    pub fn resolve_character(&self, key: &str) -> Option<CharacterId> {
        self.state.find_character(key).map(|c| c.id.clone())
    }

    /// Resolve a combatant by id or case-insensitive name.
    pub fn resolve_combatant(&self, key: &str) -> Option<CombatantId> {
        self.state.initiative.find(key).map(|c| c.id.clone())
    }

    // -- campaign & notes ---------------------------------------------------

    /// Rename the campaign.
    pub fn rename_campaign(&mut self, name: &str) -> SessionResult<()> {
        self.state.rename(name)?;
        self.save();
        Ok(())
    }

    /// Replace one notes field.
    pub fn set_note(&mut self, kind: NoteKind, text: impl Into<String>) {
        self.state.notes.set(kind, text);
        self.save();
    }

    // -- roster -------------------------------------------------------------

    /// Create a character, select it, and return its id.
    pub fn add_character(&mut self, input: NewCharacter) -> SessionResult<CharacterId> {
        let id = self.state.add_character(input)?.id.clone();
        self.save();
        Ok(id)
    }

    /// Update name, class, and level. `Ok(false)` if the character is gone.
    pub fn edit_character(&mut self, id: &CharacterId, edit: BasicsEdit) -> SessionResult<bool> {
        let changed = self.state.edit_basics(id, edit)?;
        if changed {
            self.save();
        }
        Ok(changed)
    }

    /// Delete a character.
    pub fn delete_character(&mut self, id: &CharacterId) -> Option<Character> {
        let removed = self.state.delete_character(id)?;
        self.save();
        Some(removed)
    }

    /// Select a character.
    pub fn select_character(&mut self, id: &CharacterId) -> bool {
        self.saving(|s| s.select_character(id))
    }

    /// Set one ability score.
    pub fn set_stat(&mut self, id: &CharacterId, ability: Ability, value: i32) -> bool {
        self.saving(|s| s.set_ability(id, ability, value))
    }

    /// Set current and maximum hit points.
    pub fn set_hp(&mut self, id: &CharacterId, current: i32, max: i32) -> bool {
        self.saving(|s| s.set_hp(id, current, max))
    }

    /// Set armor class.
    pub fn set_ac(&mut self, id: &CharacterId, value: i32) -> bool {
        self.saving(|s| s.set_ac(id, value))
    }

    /// Set speed.
    pub fn set_speed(&mut self, id: &CharacterId, value: i32) -> bool {
        self.saving(|s| s.set_speed(id, value))
    }

    /// Replace spells, inventory, or personal notes.
    pub fn set_character_text(
        &mut self,
        id: &CharacterId,
        field: CharacterText,
        text: impl Into<String>,
    ) -> bool {
        let text = text.into();
        self.saving(|s| s.set_character_text(id, field, text))
    }

    /// Run a roster update and save if it found its target.
    fn saving(&mut self, update: impl FnOnce(&mut CampaignState) -> bool) -> bool {
        let changed = update(&mut self.state);
        if changed {
            self.save();
        }
        changed
    }

    // -- initiative ---------------------------------------------------------

    /// Append a combatant and return its id.
    pub fn add_combatant(&mut self, input: NewCombatant) -> SessionResult<CombatantId> {
        let id = self.state.initiative.add(input)?.id.clone();
        self.save();
        Ok(id)
    }

    /// Replace a combatant's fields in place. `Ok(false)` if it is gone.
    pub fn edit_combatant(&mut self, id: &CombatantId, edit: CombatantEdit) -> SessionResult<bool> {
        let changed = self.state.initiative.edit(id, edit)?;
        if changed {
            self.save();
        }
        Ok(changed)
    }

    /// Remove a combatant.
    pub fn remove_combatant(&mut self, id: &CombatantId) -> Option<Combatant> {
        let removed = self.state.initiative.remove(id)?;
        self.save();
        Some(removed)
    }

    /// Sort combatants by descending initiative.
    pub fn sort_initiative(&mut self) {
        self.state.initiative.sort();
        self.save();
    }

    /// Advance to the next turn.
    pub fn next_turn(&mut self) -> SessionResult<TurnAdvance> {
        let advance = self.state.initiative.advance()?;
        self.save();
        Ok(advance)
    }

    /// Remove every combatant and reset the round.
    pub fn clear_initiative(&mut self) {
        self.state.initiative.clear();
        self.save();
    }

    /// Add `delta` to a combatant's hit points and return the new value.
    pub fn adjust_combatant_hp(&mut self, id: &CombatantId, delta: i32) -> Option<i32> {
        let hp = self.state.initiative.adjust_hp(id, delta)?;
        self.save();
        Some(hp)
    }

    // -- dice ---------------------------------------------------------------

    /// Roll `count` dice with `sides` sides plus `modifier`.
    pub fn roll_standard(&mut self, sides: u32, count: u32, modifier: i32) -> SessionResult<DiceRoll> {
        let expr = DiceExpr {
            count,
            die: Die::new(sides)?,
            modifier,
        };
        self.roll(expr)
    }

    /// Roll dice notation and record the result.
    pub fn roll(&mut self, expr: DiceExpr) -> SessionResult<DiceRoll> {
        let result = roll_standard(&mut self.rng, expr)?;
        let now = Utc::now();
        let entry = result.into_entry(self.state.dice_history.next_id(now), now);
        Ok(self.record(entry))
    }

    /// Roll two d20, keep one, and record the result.
    pub fn roll_advantage(&mut self, mode: AdvantageMode) -> DiceRoll {
        let result = roll_advantage(&mut self.rng, mode);
        let now = Utc::now();
        let entry = result.into_entry(self.state.dice_history.next_id(now), now);
        self.record(entry)
    }

    fn record(&mut self, entry: DiceRoll) -> DiceRoll {
        tracing::debug!(roll = %entry, "dice rolled");
        self.state.dice_history.push(entry.clone());
        self.save();
        entry
    }

    // -- import / export / reset --------------------------------------------

    /// The document as pretty JSON with a suggested file name.
    pub fn export(&self) -> SessionResult<ExportedDocument> {
        Ok(export_document(&self.state, Utc::now())?)
    }

    /// Shallow-merge `json` over the current state. Rejected documents leave
    /// the state untouched.
    pub fn import_json(&mut self, json: &str) -> SessionResult<()> {
        let merged = self
            .state
            .merged_with_json(json)
            .map_err(SessionError::Import)?;
        self.state = merged;
        self.save();
        Ok(())
    }

    /// Restore the default document.
    pub fn reset(&mut self) {
        self.state = CampaignState::new();
        self.save();
    }

    // -- command objects ----------------------------------------------------

    /// Process a line of user input and return a response.
    ///
    /// If a destructive command is pending, `yes`/`y` applies it and any
    /// other line cancels it.
    pub fn process(&mut self, input: &str) -> SessionResult<String> {
        let trimmed = input.trim();

        if let Some(command) = self.pending.take() {
            return match trimmed.to_lowercase().as_str() {
                "yes" | "y" => self.apply(command),
                _ => Ok("Cancelled.".to_string()),
            };
        }

        if trimmed.is_empty() {
            return Ok(String::new());
        }
        if matches!(trimmed.to_lowercase().as_str(), "quit" | "q" | "exit") {
            return Ok("Goodbye!".to_string());
        }

        let command = Command::parse(trimmed)?;
        if command.requires_confirmation() {
            let prompt = self.confirmation_prompt(&command);
            self.pending = Some(command);
            return Ok(prompt);
        }
        self.apply(command)
    }

    /// The question asked before a destructive command runs.
    pub fn confirmation_prompt(&self, command: &Command) -> String {
        let question = match command {
            Command::DeleteCharacter { target } => {
                let name = self
                    .state
                    .find_character(target)
                    .map_or(target.as_str(), |c| c.name.as_str());
                format!("Delete character \"{name}\"?")
            }
            Command::RemoveCombatant { target } => {
                let name = self
                    .state
                    .initiative
                    .find(target)
                    .map_or(target.as_str(), |c| c.name.as_str());
                format!("Remove \"{name}\" from initiative?")
            }
            Command::ClearInitiative => "Clear all combatants?".to_string(),
            Command::Reset => "Reset all campaign data? This cannot be undone.".to_string(),
            _ => "Are you sure?".to_string(),
        };
        format!("{question} (yes/no)")
    }

    /// Run a command without asking for confirmation.
    pub fn apply(&mut self, command: Command) -> SessionResult<String> {
        match command {
            Command::RenameCampaign { name } => {
                self.rename_campaign(&name)?;
                Ok(format!("Campaign renamed to {}.", self.state.campaign_name))
            }
            Command::AddCharacter(input) => {
                let id = self.add_character(input)?;
                Ok(self.with_character(&id, |c| {
                    format!("Character added: {} ({}).", c.name, c.subtitle())
                }))
            }
            Command::EditCharacter { target, edit } => {
                let Some(id) = self.resolve_character(&target) else {
                    return Ok(character_not_found(&target));
                };
                self.edit_character(&id, edit)?;
                Ok(self.with_character(&id, |c| {
                    format!("Character updated: {} ({}).", c.name, c.subtitle())
                }))
            }
            Command::DeleteCharacter { target } => {
                let removed = self
                    .resolve_character(&target)
                    .and_then(|id| self.delete_character(&id));
                Ok(match removed {
                    Some(c) => format!("Character deleted: {}.", c.name),
                    None => character_not_found(&target),
                })
            }
            Command::SelectCharacter { target } => {
                let Some(id) = self.resolve_character(&target) else {
                    return Ok(character_not_found(&target));
                };
                self.select_character(&id);
                Ok(self.with_character(&id, |c| format!("Selected {}.", c.name)))
            }
            Command::SetStat {
                target,
                ability,
                value,
            } => self.update_character(&target, |s, id| s.set_stat(id, ability, value), |c| {
                format!(
                    "{}: {} {} ({:+}).",
                    c.name,
                    ability.label(),
                    c.stats.get(ability),
                    c.stats.modifier(ability)
                )
            }),
            Command::SetHp {
                target,
                current,
                max,
            } => self.update_character(&target, |s, id| s.set_hp(id, current, max), |c| {
                format!("{}: HP {}.", c.name, c.hp)
            }),
            Command::SetAc { target, value } => {
                self.update_character(&target, |s, id| s.set_ac(id, value), |c| {
                    format!("{}: AC {}.", c.name, c.ac)
                })
            }
            Command::SetSpeed { target, value } => {
                self.update_character(&target, |s, id| s.set_speed(id, value), |c| {
                    format!("{}: speed {}.", c.name, c.speed)
                })
            }
            Command::SetText {
                target,
                field,
                text,
            } => self.update_character(
                &target,
                |s, id| s.set_character_text(id, field, text),
                |c| format!("{}: {field} saved.", c.name),
            ),
            Command::ListCharacters => Ok(self.render_roster()),
            Command::ShowCharacter { target } => {
                let character = match &target {
                    Some(key) => self.state.find_character(key),
                    None => self.state.selected_character(),
                };
                Ok(match (character, target) {
                    (Some(c), _) => self.render_sheet(c),
                    (None, Some(key)) => character_not_found(&key),
                    (None, None) => "No character selected.".to_string(),
                })
            }
            Command::AddCombatant(input) => {
                let id = self.add_combatant(input)?;
                Ok(self.with_combatant(&id, |c| {
                    format!("Added to initiative: {} ({}).", c.name, c.initiative)
                }))
            }
            Command::EditCombatant { target, edit } => {
                let Some(id) = self.resolve_combatant(&target) else {
                    return Ok(combatant_not_found(&target));
                };
                self.edit_combatant(&id, edit)?;
                Ok(self.with_combatant(&id, |c| {
                    format!("Combatant updated: {} ({}).", c.name, c.initiative)
                }))
            }
            Command::RemoveCombatant { target } => {
                let removed = self
                    .resolve_combatant(&target)
                    .and_then(|id| self.remove_combatant(&id));
                Ok(match removed {
                    Some(c) => format!("Removed from initiative: {}.", c.name),
                    None => combatant_not_found(&target),
                })
            }
            Command::SortInitiative => {
                self.sort_initiative();
                Ok("Initiative sorted.".to_string())
            }
            Command::NextTurn => {
                let advance = self.next_turn()?;
                let name = self
                    .state
                    .initiative
                    .current()
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                let mut out = String::new();
                if advance.new_round {
                    out.push_str(&format!("Round {} begins.\n", advance.round));
                }
                out.push_str(&format!("Round {}: {name}'s turn.", advance.round));
                Ok(out)
            }
            Command::ClearInitiative => {
                self.clear_initiative();
                Ok("Initiative cleared.".to_string())
            }
            Command::AdjustHp { target, delta } => {
                let Some(id) = self.resolve_combatant(&target) else {
                    return Ok(combatant_not_found(&target));
                };
                let hp = self.adjust_combatant_hp(&id, delta).unwrap_or_default();
                Ok(self.with_combatant(&id, |c| format!("{}: HP {hp} ({delta:+}).", c.name)))
            }
            Command::ListInitiative => Ok(self.render_initiative()),
            Command::Roll(expr) => {
                let entry = self.roll(expr)?;
                Ok(describe_roll(&entry))
            }
            Command::RollD20(mode) => {
                let entry = self.roll_advantage(mode);
                Ok(describe_roll(&entry))
            }
            Command::History => Ok(self.render_history()),
            Command::SetNote { kind, text } => {
                self.set_note(kind, text);
                Ok(format!("{} notes saved.", capitalize(&kind.to_string())))
            }
            Command::ShowNotes { kind } => Ok(self.render_notes(kind)),
            Command::Export { path } => {
                let doc = self.export()?;
                let path = path.unwrap_or_else(|| PathBuf::from(&doc.file_name));
                fs::write(&path, &doc.contents).map_err(|source| SessionError::File {
                    path: path.clone(),
                    source,
                })?;
                Ok(format!("Exported to {}.", path.display()))
            }
            Command::Import { path } => {
                let json = fs::read_to_string(&path).map_err(|source| SessionError::File {
                    path: path.clone(),
                    source,
                })?;
                self.import_json(&json)?;
                Ok(format!("Imported {}.", path.display()))
            }
            Command::Reset => {
                self.reset();
                Ok("Campaign reset to defaults.".to_string())
            }
            Command::Status => Ok(self.render_status()),
            Command::Help { topic } => Ok(help(&topic)),
        }
    }

    fn with_character(&self, id: &CharacterId, describe: impl FnOnce(&Character) -> String) -> String {
        self.state.character(id).map(describe).unwrap_or_default()
    }

    fn with_combatant(&self, id: &CombatantId, describe: impl FnOnce(&Combatant) -> String) -> String {
        self.state.initiative.get(id).map(describe).unwrap_or_default()
    }

    fn update_character(
        &mut self,
        target: &str,
        update: impl FnOnce(&mut Self, &CharacterId) -> bool,
        describe: impl FnOnce(&Character) -> String,
    ) -> SessionResult<String> {
        let Some(id) = self.resolve_character(target) else {
            return Ok(character_not_found(target));
        };
        update(self, &id);
        Ok(self.with_character(&id, describe))
    }

    // -- text rendering -----------------------------------------------------

    fn render_roster(&self) -> String {
        if self.state.characters.is_empty() {
            return "No characters yet.".to_string();
        }
        let selected = self.state.selected_character_id.as_ref();
        let mut out = format!("Characters ({}):\n", self.state.characters.len());
        for c in &self.state.characters {
            let marker = if Some(&c.id) == selected { '*' } else { ' ' };
            out.push_str(&format!(
                "{marker} {} ({}) HP {} AC {}\n",
                c.name,
                c.subtitle(),
                c.hp,
                c.ac
            ));
        }
        out.trim_end().to_string()
    }

    fn render_sheet(&self, c: &Character) -> String {
        let mut out = format!("{} ({})\n", c.name, c.subtitle());
        out.push_str(&format!("HP {}  AC {}  Speed {}\n", c.hp, c.ac, c.speed));
        let scores: Vec<String> = Ability::ALL
            .iter()
            .map(|&a| format!("{} {} ({:+})", a.label(), c.stats.get(a), c.stats.modifier(a)))
            .collect();
        out.push_str(&scores.join("  "));
        for field in [CharacterText::Spells, CharacterText::Inventory, CharacterText::Notes] {
            let text = c.text(field);
            if !text.is_empty() {
                out.push_str(&format!("\n{}: {text}", capitalize(&field.to_string())));
            }
        }
        out
    }

    fn render_initiative(&self) -> String {
        let tracker = &self.state.initiative;
        if tracker.is_empty() {
            return "No combatants.".to_string();
        }
        let mut out = format!("Round {}\n", tracker.round());
        for (i, c) in tracker.combatants().iter().enumerate() {
            let marker = if tracker.current_index() == Some(i) { '>' } else { ' ' };
            out.push_str(&format!(
                "{marker} {}. {} ({}) HP {} [{}]\n",
                i + 1,
                c.name,
                c.initiative,
                c.hp,
                c.kind
            ));
        }
        out.trim_end().to_string()
    }

    fn render_history(&self) -> String {
        let history = &self.state.dice_history;
        if history.is_empty() {
            return "No rolls yet.".to_string();
        }
        let mut out = format!("Recent rolls ({}):\n", history.len());
        for entry in history.entries() {
            out.push_str(&format!(
                "  {}  {}\n",
                entry.timestamp.format("%H:%M:%S"),
                entry.summary()
            ));
        }
        out.trim_end().to_string()
    }

    fn render_notes(&self, kind: Option<NoteKind>) -> String {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => NoteKind::ALL.to_vec(),
        };
        kinds
            .into_iter()
            .map(|k| {
                let text = self.state.notes.get(k);
                let body = if text.is_empty() { "(empty)" } else { text };
                format!("{} notes:\n{body}", capitalize(&k.to_string()))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_status(&self) -> String {
        let s = &self.state;
        let mut out = format!("Campaign: {}\n", s.campaign_name);
        out.push_str(&format!("Characters: {}", s.characters.len()));
        if let Some(c) = s.selected_character() {
            out.push_str(&format!(" (selected: {})", c.name));
        }
        out.push('\n');
        match s.initiative.current() {
            Some(c) => out.push_str(&format!(
                "Initiative: round {}, {} combatants, {}'s turn\n",
                s.initiative.round(),
                s.initiative.len(),
                c.name
            )),
            None => out.push_str(&format!(
                "Initiative: {} combatants, not started\n",
                s.initiative.len()
            )),
        }
        out.push_str(&format!("Dice history: {} rolls", s.dice_history.len()));
        out
    }
}

fn character_not_found(target: &str) -> String {
    format!("Character not found: {target}")
}

fn combatant_not_found(target: &str) -> String {
    format!("Combatant not found: {target}")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One-line result of a roll: the breakdown, plus the total for standard rolls.
pub fn describe_roll(entry: &DiceRoll) -> String {
    match entry.kind {
        RollKind::Standard => format!("{entry} → {}", entry.total),
        RollKind::Advantage | RollKind::Disadvantage => entry.to_string(),
    }
}

/// Help text for the shell.
pub fn help(topic: &str) -> String {
    match topic.trim().to_lowercase().as_str() {
        "char" | "character" | "characters" => "\
Character Commands:
  char add <name> [| class | level | max hp]   Create and select a character
  char edit <who> | <name> [| class | level]   Change name, class, level
  char delete <who>                            Delete (asks to confirm)
  char select <who>                            Select a character
  char stat <who> | <ability> | <score>        Set STR/DEX/CON/INT/WIS/CHA
  char hp <who> | <current> | <max>            Set hit points
  char ac <who> | <value>                      Set armor class
  char speed <who> | <value>                   Set speed
  char text <who> | <field> | <text>           Set spells, inventory, notes
  char list / char show [who]                  Roster / character sheet

<who> is a character id or name."
            .to_string(),
        "init" | "initiative" => "\
Initiative Commands:
  init add <name> | <init> [| hp | type]         Add a combatant
  init edit <who> | <name> | <init> [| hp | type] Edit in place
  init remove <who>                              Remove (asks to confirm)
  init sort                                      Highest initiative first
  init next (or next)                            Advance the turn
  init hp <who> | <delta>                        Damage (-) or heal (+)
  init clear                                     Remove all (asks to confirm)
  init list                                      Show the turn order

type is pc, npc, enemy, or any label."
            .to_string(),
        "dice" | "roll" => "\
Dice Commands:
  roll <dice>        Roll notation like d20, 3d6+2, 2d8-1, 4d7
  adv                Two d20, keep the higher
  dis                Two d20, keep the lower
  history            Recent rolls (last 50)"
            .to_string(),
        _ => "\
Campaign Commands:
  campaign <name>                 Rename the campaign
  char ...                        Characters (help char)
  init ... / next                 Initiative (help init)
  roll <dice> / adv / dis         Dice (help dice)
  history                         Recent rolls
  notes [session|world|rules]     Show notes
  notes set <kind> | <text>       Replace notes
  export [file]                   Export the campaign as JSON
  import <file>                   Merge a JSON export into the campaign
  reset                           Restore defaults (asks to confirm)
  status                          Campaign overview
  help [topic]                    Show help (char, init, dice)
  quit                            Exit"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, StoreResult};
    use crate::store::MemoryStore;
    use proptest::prelude::*;
    use tcc_core::{CombatantKind, HISTORY_CAPACITY};
    use tempfile::TempDir;

    fn test_session() -> CampaignSession<MemoryStore> {
        CampaignSession::new(MemoryStore::new(), SessionConfig::default().with_seed(7))
    }

    fn stored_json(s: &CampaignSession<MemoryStore>) -> String {
        s.store()
            .read(&s.config().storage_key)
            .unwrap()
            .unwrap_or_default()
    }

    #[test]
    fn create_session() {
        let s = test_session();
        assert_eq!(s.state(), &CampaignState::new());
        assert!(s.pending().is_none());
        assert!(s.store().is_empty());
    }

    #[test]
    fn session_loads_existing_document() {
        let store = MemoryStore::with_entry(
            "tcc_campaign_data_v1",
            r#"{"campaignName": "Stored", "theme": "dark"}"#,
        );
        let s = CampaignSession::new(store, SessionConfig::default());
        assert_eq!(s.state().campaign_name, "Stored");
        assert_eq!(s.state().extra["theme"], "dark");
    }

    #[test]
    fn mutation_saves_whole_document() {
        let mut s = test_session();
        s.process("char add Aria | Wizard | 3 | 24").unwrap();
        let json = stored_json(&s);
        assert!(json.contains("\"name\":\"Aria\""));
        assert!(json.contains("\"selectedCharacterId\":\"c"));

        let reopened = CampaignSession::new(s.store().clone(), SessionConfig::default());
        assert_eq!(reopened.state(), s.state());
    }

    #[test]
    fn unknown_keys_survive_save() {
        let store = MemoryStore::with_entry("tcc_campaign_data_v1", r#"{"theme": "dark"}"#);
        let mut s = CampaignSession::new(store, SessionConfig::default());
        s.process("campaign Rime").unwrap();
        assert!(stored_json(&s).contains("\"theme\":\"dark\""));
    }

    #[test]
    fn character_lifecycle() {
        let mut s = test_session();
        let out = s.process("char add Aria | Wizard | 3 | 24").unwrap();
        assert_eq!(out, "Character added: Aria (Wizard • Lv 3).");
        assert_eq!(
            s.process("char stat aria | dex | 16").unwrap(),
            "Aria: DEX 16 (+3)."
        );
        assert_eq!(s.process("char hp Aria | 5 | 24").unwrap(), "Aria: HP 5/24.");
        assert_eq!(s.process("char ac Aria | 13").unwrap(), "Aria: AC 13.");
        assert_eq!(s.process("char speed Aria | 25").unwrap(), "Aria: speed 25.");
        s.process("char text Aria | spells | Shield, Magic Missile")
            .unwrap();

        let sheet = s.process("char show").unwrap();
        assert!(sheet.starts_with("Aria (Wizard • Lv 3)"));
        assert!(sheet.contains("HP 5/24  AC 13  Speed 25"));
        assert!(sheet.contains("DEX 16 (+3)"));
        assert!(sheet.contains("Spells: Shield, Magic Missile"));
    }

    #[test]
    fn invalid_number_changes_nothing() {
        let mut s = test_session();
        s.process("char add Aria").unwrap();
        let before = stored_json(&s);
        let err = s.process("char ac Aria | high").unwrap_err();
        assert!(matches!(err, SessionError::InvalidNumber { .. }));
        assert_eq!(s.state().characters[0].ac, 10);
        assert_eq!(stored_json(&s), before);
    }

    #[test]
    fn missing_character_is_informational() {
        let mut s = test_session();
        s.process("char add Aria").unwrap();
        let before = s.store().clone();
        assert_eq!(
            s.process("char ac Zed | 12").unwrap(),
            "Character not found: Zed"
        );
        assert_eq!(s.store(), &before);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut s = test_session();
        assert!(s.add_character(NewCharacter::named("   ")).is_err());
        assert!(s.process("campaign    ").is_err());
        assert!(s.state().characters.is_empty());
    }

    #[test]
    fn edit_character_keeps_level_on_bad_input() {
        let mut s = test_session();
        s.process("char add Aria | Wizard | 3").unwrap();
        let out = s.process("char edit Aria | Aria Vale | Sorcerer | three").unwrap();
        assert_eq!(out, "Character updated: Aria Vale (Sorcerer • Lv 3).");
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut s = test_session();
        s.process("char add Aria").unwrap();
        s.process("char add Brom").unwrap();

        let prompt = s.process("char delete Brom").unwrap();
        assert_eq!(prompt, "Delete character \"Brom\"? (yes/no)");
        assert!(s.pending().is_some());
        assert_eq!(s.process("no").unwrap(), "Cancelled.");
        assert_eq!(s.state().characters.len(), 2);

        s.process("char delete Brom").unwrap();
        assert_eq!(s.process("yes").unwrap(), "Character deleted: Brom.");
        assert_eq!(s.state().characters.len(), 1);
        assert_eq!(s.state().selected_character().unwrap().name, "Aria");
    }

    #[test]
    fn initiative_flow() {
        let mut s = test_session();
        s.process("init add Aria | 9").unwrap();
        s.process("init add Goblin | 12 | 7 | enemy").unwrap();
        s.process("init sort").unwrap();
        let names: Vec<&str> = s
            .state()
            .initiative
            .combatants()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Goblin", "Aria"]);

        assert_eq!(s.process("next").unwrap(), "Round 1: Goblin's turn.");
        assert_eq!(s.process("init next").unwrap(), "Round 1: Aria's turn.");
        assert_eq!(
            s.process("init next").unwrap(),
            "Round 2 begins.\nRound 2: Goblin's turn."
        );
        assert_eq!(
            s.process("init hp goblin | -4").unwrap(),
            "Goblin: HP 3 (-4)."
        );

        let list = s.process("init list").unwrap();
        assert!(list.starts_with("Round 2"));
        assert!(list.contains("> 1. Goblin (12) HP 3 [enemy]"));
    }

    #[test]
    fn next_turn_on_empty_tracker_fails() {
        let mut s = test_session();
        assert!(s.process("next").is_err());
        assert!(s.state().initiative.is_idle());
        assert!(s.store().is_empty());
    }

    #[test]
    fn remove_clamps_cursor() {
        let mut s = test_session();
        s.process("init add A | 3").unwrap();
        s.process("init add B | 2").unwrap();
        s.process("next").unwrap();
        s.process("next").unwrap();
        assert_eq!(s.state().initiative.current_index(), Some(1));
        s.process("init remove B").unwrap();
        s.process("y").unwrap();
        assert_eq!(s.state().initiative.current_index(), Some(0));
        s.process("init remove A").unwrap();
        s.process("y").unwrap();
        assert!(s.state().initiative.is_idle());
    }

    #[test]
    fn clear_initiative_after_confirmation() {
        let mut s = test_session();
        s.process("init add A | 3").unwrap();
        s.process("next").unwrap();
        s.process("next").unwrap();
        s.process("init clear").unwrap();
        s.process("yes").unwrap();
        assert!(s.state().initiative.is_empty());
        assert_eq!(s.state().initiative.round(), 1);
        assert!(s.state().initiative.is_idle());
    }

    #[test]
    fn edit_combatant_in_place() {
        let mut s = test_session();
        s.process("init add Goblin | 12 | 7 | enemy").unwrap();
        s.process("init add Aria | 15").unwrap();
        s.process("init edit Goblin | Hobgoblin | 18 | 11 | npc").unwrap();
        let c = &s.state().initiative.combatants()[0];
        assert_eq!(c.name, "Hobgoblin");
        assert_eq!(c.initiative, 18);
        assert_eq!(c.hp, 11);
        assert_eq!(c.kind, CombatantKind::Npc);
    }

    #[test]
    fn edit_combatant_keeps_omitted_fields() {
        let mut s = test_session();
        s.process("init add Goblin | 12 | 7 | enemy").unwrap();
        s.process("init edit Goblin | Goblin | 15").unwrap();
        let c = &s.state().initiative.combatants()[0];
        assert_eq!(c.initiative, 15);
        assert_eq!(c.hp, 7);
        assert_eq!(c.kind, CombatantKind::Enemy);
    }

    #[test]
    fn rolls_are_recorded_newest_first() {
        let mut s = test_session();
        let out = s.process("roll 2d6+3").unwrap();
        assert!(out.starts_with("2d6 + 3 = ["));
        s.process("adv").unwrap();
        let history = s.state().dice_history.entries();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, RollKind::Advantage);
        assert_eq!(history[1].kind, RollKind::Standard);
        assert!(history[0].id > history[1].id);
        assert!(s.process("history").unwrap().contains("d20 Adv →"));
    }

    #[test]
    fn history_evicts_after_capacity() {
        let mut s = test_session();
        let first = s.roll_standard(20, 1, 0).unwrap();
        for _ in 0..HISTORY_CAPACITY {
            s.roll_standard(6, 1, 0).unwrap();
        }
        let history = s.state().dice_history.entries();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert!(history.iter().all(|r| r.id != first.id));
    }

    #[test]
    fn seeded_sessions_roll_alike() {
        let mut a = test_session();
        let mut b = test_session();
        for _ in 0..5 {
            assert_eq!(
                a.roll_standard(20, 3, 1).unwrap().rolls,
                b.roll_standard(20, 3, 1).unwrap().rolls
            );
        }
    }

    #[test]
    fn invalid_dice_rejected() {
        let mut s = test_session();
        assert!(s.roll_standard(1, 1, 0).is_err());
        assert!(s.roll_standard(6, 0, 0).is_err());
        assert!(s.roll_standard(6, 1001, 0).is_err());
        assert!(s.process("roll 4294967295d6").is_err());
        assert!(s.process("roll d6+-2").is_err());
        assert!(s.state().dice_history.is_empty());
    }

    #[test]
    fn notes_round_trip() {
        let mut s = test_session();
        assert_eq!(
            s.process("notes set world | Dragons sleep under the lake").unwrap(),
            "World notes saved."
        );
        let shown = s.process("notes world").unwrap();
        assert_eq!(shown, "World notes:\nDragons sleep under the lake");
        assert!(s.process("notes").unwrap().contains("Session notes:\n(empty)"));
    }

    #[test]
    fn import_merges_over_current_state() {
        let mut s = test_session();
        s.process("char add Aria").unwrap();
        s.import_json(r#"{"campaignName": "Imported", "notes": {"rules": "r"}}"#)
            .unwrap();
        assert_eq!(s.state().campaign_name, "Imported");
        assert_eq!(s.state().characters.len(), 1);
        assert_eq!(s.state().notes.rules, "r");
        assert!(stored_json(&s).contains("Imported"));
    }

    #[test]
    fn import_rejects_bad_documents() {
        let mut s = test_session();
        s.process("campaign Keep").unwrap();
        let before = s.state().clone();
        assert!(matches!(
            s.import_json("not json"),
            Err(SessionError::Import(_))
        ));
        assert!(s.import_json(r#"{"characters": "many"}"#).is_err());
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn imported_max_round_does_not_overflow() {
        let mut s = test_session();
        s.import_json(
            r#"{"initiative": {"combatants": [{"id": "k1", "name": "Goblin", "initiative": 12, "hp": 7, "type": "enemy"}], "round": 4294967295, "currentIndex": 0}}"#,
        )
        .unwrap();
        let out = s.process("next").unwrap();
        assert!(out.contains("Goblin's turn"));
        assert_eq!(s.state().initiative.round(), u32::MAX);
    }

    #[test]
    fn imported_max_roll_id_does_not_overflow() {
        let mut s = test_session();
        s.import_json(
            r#"{"diceHistory": [{"id": 18446744073709551615, "type": "adv", "die": 20, "count": 1, "mod": 0, "rolls": [3, 17], "total": 17, "timestamp": "2024-05-01T12:00:00Z"}]}"#,
        )
        .unwrap();
        s.process("adv").unwrap();
        let history = &s.state().dice_history;
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].id, u64::MAX);
    }

    #[test]
    fn export_and_import_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");

        let mut s = test_session();
        s.process("campaign Waterdeep").unwrap();
        s.process("char add Aria").unwrap();
        let out = s
            .process(&format!("export {}", path.display()))
            .unwrap();
        assert!(out.starts_with("Exported to"));

        let mut other = test_session();
        other.process(&format!("import {}", path.display())).unwrap();
        assert_eq!(other.state().campaign_name, "Waterdeep");
        assert_eq!(other.state().characters.len(), 1);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            other.process(&format!("import {}", missing.display())),
            Err(SessionError::File { .. })
        ));
    }

    #[test]
    fn export_suggests_file_name() {
        let s = test_session();
        let doc = s.export().unwrap();
        assert!(doc.file_name.starts_with("tcc_campaign_"));
        assert!(doc.file_name.ends_with(".json"));
    }

    #[test]
    fn reset_after_confirmation() {
        let mut s = test_session();
        s.process("campaign Gone").unwrap();
        s.process("char add Aria").unwrap();
        assert_eq!(
            s.process("reset").unwrap(),
            "Reset all campaign data? This cannot be undone. (yes/no)"
        );
        s.process("YES").unwrap();
        assert_eq!(s.state(), &CampaignState::new());
        assert!(stored_json(&s).contains("My Campaign"));
    }

    #[test]
    fn status_and_help() {
        let mut s = test_session();
        s.process("char add Aria").unwrap();
        let status = s.process("status").unwrap();
        assert!(status.contains("Campaign: My Campaign"));
        assert!(status.contains("Characters: 1 (selected: Aria)"));
        assert!(status.contains("not started"));
        assert!(s.process("help").unwrap().contains("Campaign Commands"));
        assert!(s.process("help init").unwrap().contains("init sort"));
    }

    #[test]
    fn quit_and_empty_input() {
        let mut s = test_session();
        assert_eq!(s.process("quit").unwrap(), "Goodbye!");
        assert_eq!(s.process("   ").unwrap(), "");
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn read(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("read disabled".to_string()))
        }
        fn write(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_store_keeps_session_in_memory() {
        let mut s = CampaignSession::new(BrokenStore, SessionConfig::default().with_seed(1));
        s.process("char add Aria").unwrap();
        s.process("roll d20").unwrap();
        assert_eq!(s.state().characters.len(), 1);
        assert_eq!(s.state().dice_history.len(), 1);
    }

    proptest! {
        #[test]
        fn full_cycle_returns_to_same_combatant(n in 1usize..12, k in 0usize..12) {
            let mut s = test_session();
            for i in 0..n {
                s.add_combatant(NewCombatant {
                    name: format!("C{i}"),
                    initiative: i as i32,
                    ..NewCombatant::default()
                })
                .unwrap();
            }
            // Leave Idle, then move somewhere inside the first round.
            s.next_turn().unwrap();
            for _ in 0..(k % n) {
                s.next_turn().unwrap();
            }
            let index = s.state().initiative.current_index();
            let round = s.state().initiative.round();
            for _ in 0..n {
                s.next_turn().unwrap();
            }
            prop_assert_eq!(s.state().initiative.current_index(), index);
            prop_assert_eq!(s.state().initiative.round(), round + 1);
        }
    }
}
