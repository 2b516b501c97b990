use std::fmt;

use tracing::debug;

use crate::character::{Character, CharacterId};
use crate::error::{RulesError, RulesResult};
use crate::rules::Rules;

#[derive(Debug, Clone, Copy)]
pub struct CheckInput {
    pub dc: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    pub roll: i32,
    pub total: i32,
    pub dc: i32,
    pub passed: bool,
}

/// Roll a d20, add modifier, compare vs DC (meet or beat).
pub fn check(mut d20: impl FnMut() -> i32, input: CheckInput) -> CheckResult {
    let roll = d20();
    let total = roll.saturating_add(input.modifier);
    CheckResult { roll, total, dc: input.dc, passed: total >= input.dc }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCheckResult {
    pub skill: String,
    pub roll: i32,
    /// Skill total before the roll.
    pub skill_total: i32,
    pub total: i32,
    pub dc: i32,
    pub success: bool,
}

impl fmt::Display for SkillCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Roll: {}, Total: {} - {}",
            self.roll,
            self.total,
            outcome_word(self.success)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyCheckResult {
    pub character_id: CharacterId,
    pub character_name: String,
    pub skill: String,
    pub roll: i32,
    pub skill_total: i32,
    pub total: i32,
    pub dc: i32,
    pub success: bool,
}

impl fmt::Display for PartyCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Character: {}, Roll: {}, Total: {} - {}",
            self.character_name,
            self.roll,
            self.total,
            outcome_word(self.success)
        )
    }
}

fn outcome_word(success: bool) -> &'static str {
    if success { "Success" } else { "Failure" }
}

impl Rules<'_> {
    /// d20 + skill total against `dc`. `d20` must return a value in 1..=20.
    pub fn resolve_skill_check(
        &self,
        character: &Character,
        skill: &str,
        dc: i32,
        d20: impl FnMut() -> i32,
    ) -> RulesResult<SkillCheckResult> {
        let name = self.catalog().skill(skill)?.name.clone();
        let skill_total = self.skill_total(character, &name)?;
        let res = check(d20, CheckInput { dc, modifier: skill_total });
        debug!(
            "[CHECK][{}] {} d20={} {:+} = {} vs DC {} → {}",
            character.name,
            name,
            res.roll,
            skill_total,
            res.total,
            dc,
            if res.passed { "SUCCESS" } else { "FAIL" }
        );
        Ok(SkillCheckResult {
            skill: name,
            roll: res.roll,
            skill_total,
            total: res.total,
            dc,
            success: res.passed,
        })
    }

    /// One shared roll for the party member with the highest skill total.
    /// Ties go to the earliest character in `party`; all-negative totals
    /// still pick the true maximum.
    pub fn resolve_party_skill_check(
        &self,
        party: &[Character],
        skill: &str,
        dc: i32,
        d20: impl FnMut() -> i32,
    ) -> RulesResult<PartyCheckResult> {
        let name = self.catalog().skill(skill)?.name.clone();

        let mut best: Option<(&Character, i32)> = None;
        for character in party {
            let total = self.skill_total(character, &name)?;
            match best {
                Some((_, incumbent)) if total <= incumbent => {}
                _ => best = Some((character, total)),
            }
        }
        let (champion, skill_total) = best.ok_or(RulesError::EmptyParty)?;

        let res = check(d20, CheckInput { dc, modifier: skill_total });
        debug!(
            "[PARTY] {} picked for {} (total {:+}) d20={} = {} vs DC {} → {}",
            champion.name,
            name,
            skill_total,
            res.roll,
            res.total,
            dc,
            if res.passed { "SUCCESS" } else { "FAIL" }
        );
        Ok(PartyCheckResult {
            character_id: champion.id.clone(),
            character_name: champion.name.clone(),
            skill: name,
            roll: res.roll,
            skill_total,
            total: res.total,
            dc,
            success: res.passed,
        })
    }
}
