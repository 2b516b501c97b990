use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{RulesError, RulesResult};

/// Opaque character identifier. Stored ids are kept verbatim, so records
/// written by other tools (e.g. timestamp ids) load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub attributes: IndexMap<String, i32>,
    #[serde(default)]
    pub selected_class: Option<String>,
    #[serde(default)]
    pub skill_points: IndexMap<String, u32>,
}

impl Character {
    /// Fresh character: every attribute at the catalog default, no class,
    /// zero points in every skill.
    pub fn new(name: impl Into<String>, catalog: &Catalog) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            attributes: catalog
                .attributes
                .iter()
                .map(|a| (a.clone(), catalog.default_score))
                .collect(),
            selected_class: None,
            skill_points: catalog.skills.iter().map(|s| (s.name.clone(), 0)).collect(),
        }
    }

    /// Score of an attribute, by canonical name.
    pub fn score(&self, attribute: &str) -> RulesResult<i32> {
        self.attributes
            .get(attribute)
            .copied()
            .ok_or_else(|| RulesError::UnknownAttribute(attribute.to_string()))
    }

    /// Points allocated to a skill, 0 if never allocated.
    pub fn points(&self, skill: &str) -> u32 {
        self.skill_points.get(skill).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_character_uses_catalog_defaults() {
        let catalog = Catalog::builtin().unwrap();
        let c = Character::new("Aria", &catalog);
        assert_eq!(c.name, "Aria");
        assert_eq!(c.attributes.len(), 6);
        assert!(c.attributes.values().all(|&v| v == 10));
        assert_eq!(c.selected_class, None);
        assert_eq!(c.skill_points.len(), 18);
        assert!(c.skill_points.values().all(|&p| p == 0));
    }

    #[test]
    fn ids_are_unique() {
        let catalog = Catalog::builtin().unwrap();
        let a = Character::new("A", &catalog);
        let b = Character::new("B", &catalog);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let catalog = Catalog::builtin().unwrap();
        let c = Character::new("Aria", &catalog);
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("selectedClass").is_some());
        assert_eq!(json["skillPoints"]["Stealth"], 0);
        assert_eq!(json["attributes"]["Strength"], 10);
    }

    #[test]
    fn reads_records_with_foreign_ids() {
        let json = r#"{"id":"1718000000000","name":"Old","attributes":{"Strength":12},
                       "selectedClass":"Bard","skillPoints":{"Stealth":3}}"#;
        let c: Character = serde_json::from_str(json).unwrap();
        assert_eq!(c.id.as_str(), "1718000000000");
        assert_eq!(c.score("Strength").unwrap(), 12);
        assert_eq!(c.points("Stealth"), 3);
        assert_eq!(c.points("Arcana"), 0);
        assert!(c.score("Dexterity").is_err());
    }
}
