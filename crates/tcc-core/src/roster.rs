//! Character roster operations on the campaign document.
//!
//! The roster is the `characters` array plus the `selectedCharacterId` weak
//! reference. Operations on an id that is no longer present are no-ops and
//! report `false`/`None`.

use crate::character::{Ability, BasicsEdit, Character, CharacterId, CharacterText, NewCharacter};
use crate::error::{CoreError, CoreResult};
use crate::state::CampaignState;

impl CampaignState {
    /// Create a character, append it to the roster, and select it.
    pub fn add_character(&mut self, input: NewCharacter) -> CoreResult<&Character> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::EmptyName("character"));
        }
        let character = Character::new(NewCharacter { name, ..input });
        self.selected_character_id = Some(character.id.clone());
        self.characters.push(character);
        Ok(&self.characters[self.characters.len() - 1])
    }

    /// Look up a character by id.
    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    /// Look up a character by id, mutably.
    pub fn character_mut(&mut self, id: &CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| &c.id == id)
    }

    /// Find a character by exact id, then by case-insensitive name.
    pub fn find_character(&self, key: &str) -> Option<&Character> {
        let key = key.trim();
        self.characters
            .iter()
            .find(|c| c.id.as_str() == key)
            .or_else(|| {
                let lower = key.to_lowercase();
                self.characters
                    .iter()
                    .find(|c| c.name.to_lowercase() == lower)
            })
    }

    /// The selected character, if the selection still resolves.
    pub fn selected_character(&self) -> Option<&Character> {
        self.selected_character_id
            .as_ref()
            .and_then(|id| self.character(id))
    }

    /// Select a character. Returns false if the id is unknown.
    pub fn select_character(&mut self, id: &CharacterId) -> bool {
        if self.character(id).is_none() {
            return false;
        }
        self.selected_character_id = Some(id.clone());
        true
    }

    /// Update name, class, and level.
    ///
    /// Returns `Ok(false)` when the character is gone. An empty name aborts
    /// the whole edit.
    pub fn edit_basics(&mut self, id: &CharacterId, edit: BasicsEdit) -> CoreResult<bool> {
        let Some(c) = self.character_mut(id) else {
            return Ok(false);
        };
        let name = edit.name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName("character"));
        }
        c.name = name.to_string();
        if let Some(class) = edit.class {
            c.class = class;
        }
        if let Some(level) = edit.level {
            c.level = level;
        }
        Ok(true)
    }

    /// Remove a character. A removed selection falls to the first remaining
    /// character, or to none.
    pub fn delete_character(&mut self, id: &CharacterId) -> Option<Character> {
        let idx = self.characters.iter().position(|c| &c.id == id)?;
        let removed = self.characters.remove(idx);
        if self.selected_character_id.as_ref() == Some(id) {
            self.selected_character_id = self.characters.first().map(|c| c.id.clone());
        }
        Some(removed)
    }

    /// Set one ability score.
    pub fn set_ability(&mut self, id: &CharacterId, ability: Ability, value: i32) -> bool {
        self.character_mut(id)
            .map(|c| c.stats.set(ability, value))
            .is_some()
    }

    /// Set current and maximum hit points.
    pub fn set_hp(&mut self, id: &CharacterId, current: i32, max: i32) -> bool {
        self.character_mut(id)
            .map(|c| {
                c.hp.current = current;
                c.hp.max = max;
            })
            .is_some()
    }

    /// Set armor class.
    pub fn set_ac(&mut self, id: &CharacterId, value: i32) -> bool {
        self.character_mut(id).map(|c| c.ac = value).is_some()
    }

    /// Set walking speed.
    pub fn set_speed(&mut self, id: &CharacterId, value: i32) -> bool {
        self.character_mut(id).map(|c| c.speed = value).is_some()
    }

    /// Replace one of a character's free-text fields.
    pub fn set_character_text(
        &mut self,
        id: &CharacterId,
        field: CharacterText,
        text: impl Into<String>,
    ) -> bool {
        self.character_mut(id)
            .map(|c| c.set_text(field, text))
            .is_some()
    }
}
