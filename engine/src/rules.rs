//! Attribute budgeting, class qualification and skill bookkeeping.
//!
//! Every operation works on a caller-owned [`Character`]; the engine holds
//! nothing but a reference to the catalog and performs no I/O.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::attribute_mod;
use crate::catalog::{Catalog, Requirements};
use crate::character::Character;
use crate::error::{RulesError, RulesResult};

/// Why an edit was refused. The character is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WouldGoNegative,
    WouldExceedBudget,
    /// Skill points past what a check total can hold.
    TooLarge,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldGoNegative => write!(f, "value would drop below 0"),
            Self::WouldExceedBudget => write!(f, "attribute budget would be exceeded"),
            Self::TooLarge => write!(f, "value would be out of range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// `name` is the catalog spelling of the edited attribute or skill.
    Applied { name: String, from: i32, to: i32 },
    Rejected(Rejection),
}

impl AdjustOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLine {
    pub name: String,
    pub score: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLine {
    pub name: String,
    pub qualifies: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLine {
    pub name: String,
    pub attribute: String,
    pub points: u32,
    pub modifier: i32,
    pub total: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Rules<'c> {
    catalog: &'c Catalog,
}

impl<'c> Rules<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn create_character(&self, name: impl Into<String>) -> Character {
        let character = Character::new(name, self.catalog);
        debug!("[NEW][{}] created with id {}", character.name, character.id);
        character
    }

    /// Rekey a stored record to catalog spelling and order, filling missing
    /// attributes and skills with the catalog defaults. Existing values are
    /// left alone; names the catalog does not know are kept at the end so
    /// [`Rules::validate`] can report them.
    pub fn conform(&self, character: &mut Character) {
        canonicalize(
            &mut character.attributes,
            self.catalog.attributes.iter().map(String::as_str),
            self.catalog.default_score,
        );
        canonicalize(
            &mut character.skill_points,
            self.catalog.skills.iter().map(|s| s.name.as_str()),
            0,
        );
        let class = character
            .selected_class
            .as_deref()
            .and_then(|c| self.catalog.class(c).ok())
            .map(|(name, _)| name.to_string());
        if class.is_some() {
            character.selected_class = class;
        }
    }

    /// Check a record against the character invariants: only catalog names,
    /// every attribute present and non-negative, the sum within budget, and
    /// skill points that fit a check total.
    pub fn validate(&self, character: &Character) -> RulesResult<()> {
        for (name, &score) in &character.attributes {
            let attribute = self.catalog.attribute(name)?;
            if score < 0 {
                return Err(RulesError::NegativeScore {
                    attribute: attribute.to_string(),
                    score,
                });
            }
        }
        for attribute in &self.catalog.attributes {
            character.score(attribute)?;
        }
        let sum = self.attribute_sum(character);
        if sum > i64::from(self.catalog.max_attribute_sum) {
            return Err(RulesError::OverBudget {
                sum,
                max: self.catalog.max_attribute_sum,
            });
        }
        if let Some(class) = character.selected_class.as_deref() {
            self.catalog.class(class)?;
        }
        for skill in character.skill_points.keys() {
            let def = self.catalog.skill(skill)?;
            points_of(character, &def.name)?;
        }
        Ok(())
    }

    /// [`Rules::conform`] then [`Rules::validate`]; the gate for records
    /// coming from outside the engine.
    pub fn admit(&self, mut character: Character) -> RulesResult<Character> {
        self.conform(&mut character);
        self.validate(&character)?;
        Ok(character)
    }

    /* ---------------- attributes ---------------- */

    pub fn attribute_sum(&self, character: &Character) -> i64 {
        character.attributes.values().map(|&v| i64::from(v)).sum()
    }

    /// Points left under the attribute budget. Negative for records that
    /// were already over budget when loaded.
    pub fn remaining_budget(&self, character: &Character) -> i64 {
        i64::from(self.catalog.max_attribute_sum) - self.attribute_sum(character)
    }

    pub fn max_reached(&self, character: &Character) -> bool {
        self.remaining_budget(character) <= 0
    }

    /// Change one attribute by `delta`.
    ///
    /// Applied iff the new score stays >= 0 and, for non-negative deltas,
    /// the attribute sum stays within the budget. Decrements are never
    /// blocked by the budget.
    pub fn adjust_attribute(
        &self,
        character: &mut Character,
        attribute: &str,
        delta: i32,
    ) -> RulesResult<AdjustOutcome> {
        let name = self.catalog.attribute(attribute)?;
        let sum = self.attribute_sum(character);
        let score = character
            .attributes
            .get_mut(name)
            .ok_or_else(|| RulesError::UnknownAttribute(name.to_string()))?;

        let from = *score;
        let outcome = match from.checked_add(delta) {
            None if delta > 0 => AdjustOutcome::Rejected(Rejection::WouldExceedBudget),
            None => AdjustOutcome::Rejected(Rejection::WouldGoNegative),
            Some(to) if to < 0 => AdjustOutcome::Rejected(Rejection::WouldGoNegative),
            Some(_)
                if delta >= 0
                    && sum + i64::from(delta) > i64::from(self.catalog.max_attribute_sum) =>
            {
                AdjustOutcome::Rejected(Rejection::WouldExceedBudget)
            }
            Some(to) => {
                *score = to;
                AdjustOutcome::Applied {
                    name: name.to_string(),
                    from,
                    to,
                }
            }
        };

        match &outcome {
            AdjustOutcome::Applied { from, to, .. } => {
                debug!("[ATTR][{}] {} {} → {}", character.name, name, from, to);
            }
            AdjustOutcome::Rejected(reason) => debug!(
                "[ATTR][{}] {} {:+} rejected: {} (sum={})",
                character.name, name, delta, reason, sum
            ),
        }
        Ok(outcome)
    }

    pub fn attribute_sheet(&self, character: &Character) -> RulesResult<Vec<AttributeLine>> {
        self.catalog
            .attributes
            .iter()
            .map(|name| {
                let score = character.score(name)?;
                Ok(AttributeLine {
                    name: name.clone(),
                    score,
                    modifier: attribute_mod(score),
                })
            })
            .collect()
    }

    /* ---------------- classes ---------------- */

    /// True iff every attribute named in `requirements` meets its minimum.
    /// An empty requirement record always qualifies.
    pub fn qualifies(&self, character: &Character, requirements: &Requirements) -> RulesResult<bool> {
        for (attr, min) in requirements {
            let name = self.catalog.attribute(attr)?;
            if character.score(name)? < *min {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn qualifies_for_class(&self, character: &Character, class: &str) -> RulesResult<bool> {
        let requirements = self.catalog.class_requirements(class)?;
        self.qualifies(character, requirements)
    }

    /// Select a class whether or not the character meets its requirements.
    /// Returns whether it qualifies, for display.
    pub fn select_class(&self, character: &mut Character, class: &str) -> RulesResult<bool> {
        let (name, requirements) = self.catalog.class(class)?;
        let qualifies = self.qualifies(character, requirements)?;
        character.selected_class = Some(name.to_string());
        debug!(
            "[CLASS][{}] selected {} (qualifies={})",
            character.name, name, qualifies
        );
        Ok(qualifies)
    }

    pub fn class_board(&self, character: &Character) -> RulesResult<Vec<ClassLine>> {
        self.catalog
            .classes
            .iter()
            .map(|(name, requirements)| {
                Ok(ClassLine {
                    name: name.clone(),
                    qualifies: self.qualifies(character, requirements)?,
                    selected: character.selected_class.as_deref() == Some(name.as_str()),
                })
            })
            .collect()
    }

    /* ---------------- skills ---------------- */

    /// Allocated points plus the governing attribute's modifier.
    pub fn skill_total(&self, character: &Character, skill: &str) -> RulesResult<i32> {
        let def = self.catalog.skill(skill)?;
        let score = character.score(self.catalog.attribute(&def.attribute_modifier)?)?;
        Ok(points_of(character, &def.name)?.saturating_add(attribute_mod(score)))
    }

    /// `base + INT modifier * per_modifier`; informational, never enforced.
    pub fn available_skill_points(&self, character: &Character) -> RulesResult<i64> {
        let int = character.score(self.catalog.attribute("Intelligence")?)?;
        Ok(i64::from(self.catalog.base_skill_points)
            + i64::from(attribute_mod(int)) * i64::from(self.catalog.skill_points_per_modifier))
    }

    pub fn spent_skill_points(&self, character: &Character) -> i64 {
        character.skill_points.values().map(|&p| i64::from(p)).sum()
    }

    pub fn remaining_skill_points(&self, character: &Character) -> RulesResult<i64> {
        let remaining = self.available_skill_points(character)? - self.spent_skill_points(character);
        if remaining < 0 {
            debug!(
                "[SKILL][{}] over-allocated by {} point(s)",
                character.name, -remaining
            );
        }
        Ok(remaining)
    }

    /// Points above `i32::MAX` are refused so totals stay exact.
    pub fn set_skill_points(
        &self,
        character: &mut Character,
        skill: &str,
        points: u32,
    ) -> RulesResult<()> {
        let name = self.catalog.skill(skill)?.name.clone();
        if i32::try_from(points).is_err() {
            return Err(RulesError::PointsOutOfRange { skill: name, points });
        }
        debug!("[SKILL][{}] {} = {}", character.name, name, points);
        character.skill_points.insert(name, points);
        Ok(())
    }

    pub fn adjust_skill_points(
        &self,
        character: &mut Character,
        skill: &str,
        delta: i32,
    ) -> RulesResult<AdjustOutcome> {
        let name = self.catalog.skill(skill)?.name.as_str();
        let from = points_of(character, name)?;
        let rejection = match from.checked_add(delta) {
            None if delta > 0 => Some(Rejection::TooLarge),
            None => Some(Rejection::WouldGoNegative),
            Some(to) if to < 0 => Some(Rejection::WouldGoNegative),
            Some(_) => None,
        };
        if let Some(reason) = rejection {
            debug!(
                "[SKILL][{}] {} {:+} rejected: {}",
                character.name, name, delta, reason
            );
            return Ok(AdjustOutcome::Rejected(reason));
        }
        let to = from + delta;
        character.skill_points.insert(name.to_string(), to.unsigned_abs());
        debug!("[SKILL][{}] {} {} → {}", character.name, name, from, to);
        Ok(AdjustOutcome::Applied {
            name: name.to_string(),
            from,
            to,
        })
    }

    pub fn skill_sheet(&self, character: &Character) -> RulesResult<Vec<SkillLine>> {
        self.catalog
            .skills
            .iter()
            .map(|def| {
                let score = character.score(self.catalog.attribute(&def.attribute_modifier)?)?;
                let points = points_of(character, &def.name)?;
                let modifier = attribute_mod(score);
                Ok(SkillLine {
                    name: def.name.clone(),
                    attribute: def.attribute_modifier.clone(),
                    points: character.points(&def.name),
                    modifier,
                    total: points.saturating_add(modifier),
                })
            })
            .collect()
    }
}

/// Allocated points as a signed value; stored counts above `i32::MAX` are errors.
fn points_of(character: &Character, skill: &str) -> RulesResult<i32> {
    let points = character.points(skill);
    i32::try_from(points).map_err(|_| RulesError::PointsOutOfRange {
        skill: skill.to_string(),
        points,
    })
}

/// Reorder `map` to follow `names`, matching keys case-insensitively and
/// inserting `default` for names it lacks. Unmatched keys go last.
fn canonicalize<'n, V: Copy>(
    map: &mut IndexMap<String, V>,
    names: impl Iterator<Item = &'n str>,
    default: V,
) {
    let mut rest = std::mem::take(map);
    for name in names {
        let value = rest
            .keys()
            .position(|k| k.eq_ignore_ascii_case(name))
            .and_then(|i| rest.shift_remove_index(i))
            .map_or(default, |(_, v)| v);
        map.insert(name.to_string(), value);
    }
    map.extend(rest);
}
