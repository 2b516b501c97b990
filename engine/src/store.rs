//! Character persistence.
//!
//! `list` never fails: a store that cannot be read reports an empty roster
//! and logs the cause. `save` returns its failure to the caller.

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::character::{Character, CharacterId};

pub trait CharacterStore {
    fn list(&self) -> Vec<Character>;
    fn save(&self, character: &Character) -> Result<()>;
}

/// Whole roster as one JSON array on disk. Saving upserts by id.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Character>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read characters: {}", self.path.display()))?;
        let data = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse characters: {}", self.path.display()))?;
        Ok(data)
    }
}

impl CharacterStore for JsonFileStore {
    fn list(&self) -> Vec<Character> {
        if !self.path.exists() {
            debug!("[STORE] {} does not exist yet", self.path.display());
            return Vec::new();
        }
        match self.read_all() {
            Ok(characters) => characters,
            Err(e) => {
                warn!("[STORE] error fetching characters: {e:#}");
                Vec::new()
            }
        }
    }

    fn save(&self, character: &Character) -> Result<()> {
        let mut all = if self.path.exists() {
            self.read_all()?
        } else {
            Vec::new()
        };
        match all.iter_mut().find(|c| c.id == character.id) {
            Some(slot) => *slot = character.clone(),
            None => all.push(character.clone()),
        }
        let json = serde_json::to_string_pretty(&all)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to save characters: {}", self.path.display()))?;
        debug!("[STORE] saved {} ({})", character.name, character.id);
        Ok(())
    }
}

/// In-memory store holding serialized documents, so every `list` is a
/// real reload.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RefCell<Vec<(CharacterId, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.borrow().is_empty()
    }
}

impl CharacterStore for MemoryStore {
    fn list(&self) -> Vec<Character> {
        let docs = self.docs.borrow();
        let parsed: Result<Vec<Character>, _> = docs
            .iter()
            .map(|(_, doc)| serde_json::from_str(doc))
            .collect();
        match parsed {
            Ok(characters) => characters,
            Err(e) => {
                warn!("[STORE] error fetching characters: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, character: &Character) -> Result<()> {
        let doc = serde_json::to_string(character)?;
        let mut docs = self.docs.borrow_mut();
        match docs.iter_mut().find(|(id, _)| *id == character.id) {
            Some(slot) => slot.1 = doc,
            None => docs.push((character.id.clone(), doc)),
        }
        Ok(())
    }
}
