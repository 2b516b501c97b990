use tracing::{debug, warn};

use crate::character::Character;
use crate::error::{RulesError, RulesResult};
use crate::rules::Rules;
use crate::store::CharacterStore;

/// Ordered party with a current selection. Never empty.
#[derive(Debug, Clone)]
pub struct Roster {
    characters: Vec<Character>,
    current: usize,
}

impl Roster {
    /// Conform the given characters to the catalog; seed `Character 1`
    /// when there are none. Records that break the character invariants
    /// are kept and logged.
    pub fn new(rules: &Rules<'_>, mut characters: Vec<Character>) -> Self {
        if characters.is_empty() {
            characters.push(rules.create_character("Character 1"));
        }
        for character in &mut characters {
            rules.conform(character);
            if let Err(e) = rules.validate(character) {
                warn!("[ROSTER][{}] invalid record kept: {}", character.name, e);
            }
        }
        Self { characters, current: 0 }
    }

    /// An empty or unreadable store yields a single fresh character.
    pub fn load(store: &dyn CharacterStore, rules: &Rules<'_>) -> Self {
        let characters = store.list();
        debug!("[ROSTER] loaded {} character(s)", characters.len());
        Self::new(rules, characters)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Character {
        &self.characters[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Character {
        &mut self.characters[self.current]
    }

    pub fn select(&mut self, index: usize) -> RulesResult<&Character> {
        if index >= self.characters.len() {
            return Err(RulesError::NoSuchCharacter(index.to_string()));
        }
        self.current = index;
        Ok(&self.characters[index])
    }

    /// Append `Character N` (N = new roster size). Selection is unchanged.
    pub fn add_new(&mut self, rules: &Rules<'_>) -> &mut Character {
        let name = format!("Character {}", self.characters.len() + 1);
        self.push(rules.create_character(name))
    }

    /// Add an existing record, replacing any entry with the same id.
    pub fn push(&mut self, character: Character) -> &mut Character {
        let index = match self.characters.iter().position(|c| c.id == character.id) {
            Some(index) => {
                self.characters[index] = character;
                index
            }
            None => {
                self.characters.push(character);
                self.characters.len() - 1
            }
        };
        &mut self.characters[index]
    }

    /// Position of the character whose id matches `key` exactly, else whose
    /// name matches case-insensitively.
    pub fn find(&self, key: &str) -> RulesResult<usize> {
        self.characters
            .iter()
            .position(|c| c.id.as_str() == key)
            .or_else(|| {
                self.characters
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(key))
            })
            .ok_or_else(|| RulesError::NoSuchCharacter(key.to_string()))
    }
}
