//! Attribute, class and skill catalogs plus the numeric rule constants.
//!
//! A [`Catalog`] is loaded once (the embedded standard catalog or a file)
//! and handed to [`crate::Rules`] by reference.

use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

pub const MAX_ATTRIBUTE_SUM: i32 = 70;
pub const DEFAULT_SCORE: i32 = 10;
pub const BASE_SKILL_POINTS: i32 = 10;
pub const SKILL_POINTS_PER_MODIFIER: i32 = 4;

const STANDARD_CATALOG: &str = include_str!("../content/catalog/standard.yaml");

/// Minimum attribute scores a class asks for. May name only some attributes.
pub type Requirements = IndexMap<String, i32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub name: String,
    /// The attribute whose modifier is added to this skill.
    #[serde(rename = "attributeModifier")]
    pub attribute_modifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Catalog {
    #[serde(default = "default_max_attribute_sum")]
    pub max_attribute_sum: i32,
    #[serde(default = "default_score")]
    pub default_score: i32,
    #[serde(default = "default_base_skill_points")]
    pub base_skill_points: i32,
    #[serde(default = "default_skill_points_per_modifier")]
    pub skill_points_per_modifier: i32,
    pub attributes: Vec<String>,
    #[serde(default)]
    pub classes: IndexMap<String, Requirements>,
    #[serde(default)]
    pub skills: Vec<SkillDef>,
}

fn default_max_attribute_sum() -> i32 {
    MAX_ATTRIBUTE_SUM
}

fn default_score() -> i32 {
    DEFAULT_SCORE
}

fn default_base_skill_points() -> i32 {
    BASE_SKILL_POINTS
}

fn default_skill_points_per_modifier() -> i32 {
    SKILL_POINTS_PER_MODIFIER
}

impl Catalog {
    /// The standard six-attribute catalog shipped with the engine.
    pub fn builtin() -> RulesResult<Self> {
        Self::from_yaml_str(STANDARD_CATALOG)
    }

    pub fn from_yaml_str(text: &str) -> RulesResult<Self> {
        let catalog: Catalog =
            serde_yaml::from_str(text).map_err(|e| RulesError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(text: &str) -> RulesResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(text).map_err(|e| RulesError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        };
        catalog.with_context(|| format!("failed to load catalog: {}", path.display()))
    }

    /// Check that every name the catalog refers to is defined exactly once.
    pub fn validate(&self) -> RulesResult<()> {
        if self.attributes.is_empty() {
            return Err(RulesError::InvalidCatalog("no attributes defined".into()));
        }
        let mut seen = HashSet::new();
        for attr in &self.attributes {
            if !seen.insert(attr.to_lowercase()) {
                return Err(RulesError::InvalidCatalog(format!(
                    "duplicate attribute '{attr}'"
                )));
            }
        }
        for (class, reqs) in &self.classes {
            for attr in reqs.keys() {
                if !self.has_attribute(attr) {
                    return Err(RulesError::InvalidCatalog(format!(
                        "class '{class}' requires unknown attribute '{attr}'"
                    )));
                }
            }
        }
        let mut seen = HashSet::new();
        for skill in &self.skills {
            if !seen.insert(skill.name.to_lowercase()) {
                return Err(RulesError::InvalidCatalog(format!(
                    "duplicate skill '{}'",
                    skill.name
                )));
            }
            if !self.has_attribute(&skill.attribute_modifier) {
                return Err(RulesError::InvalidCatalog(format!(
                    "skill '{}' uses unknown attribute '{}'",
                    skill.name, skill.attribute_modifier
                )));
            }
        }
        Ok(())
    }

    /// Canonical spelling of an attribute name (matched case-insensitively).
    pub fn attribute(&self, name: &str) -> RulesResult<&str> {
        self.attributes
            .iter()
            .find(|a| a.eq_ignore_ascii_case(name))
            .map(String::as_str)
            .ok_or_else(|| RulesError::UnknownAttribute(name.to_string()))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_ok()
    }

    pub fn skill(&self, name: &str) -> RulesResult<&SkillDef> {
        self.skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RulesError::UnknownSkill(name.to_string()))
    }

    /// Canonical class name and its requirements.
    pub fn class(&self, name: &str) -> RulesResult<(&str, &Requirements)> {
        self.classes
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(name))
            .map(|(c, reqs)| (c.as_str(), reqs))
            .ok_or_else(|| RulesError::UnknownClass(name.to_string()))
    }

    pub fn class_requirements(&self, name: &str) -> RulesResult<&Requirements> {
        self.class(name).map(|(_, reqs)| reqs)
    }
}
