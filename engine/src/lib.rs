use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod catalog;
pub mod character;
pub mod checks;
pub mod error;
pub mod roster;
pub mod rules;
pub mod store;

pub use catalog::{Catalog, Requirements, SkillDef};
pub use character::{Character, CharacterId};
pub use checks::{check, CheckInput, CheckResult, PartyCheckResult, SkillCheckResult};
pub use error::{RulesError, RulesResult};
pub use roster::Roster;
pub use rules::{AdjustOutcome, AttributeLine, ClassLine, Rejection, Rules, SkillLine};
pub use store::{CharacterStore, JsonFileStore, MemoryStore};

pub struct Dice { rng: ChaCha8Rng }

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Non-deterministic dice for normal play.
    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    pub fn d20(&mut self) -> i32 {
        self.rng.gen_range(1..=20)
    }
}

/// Attribute modifier = floor((score - 10) / 2) for integer scores.
pub fn attribute_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division;
    // halving before the offset keeps the whole i32 range in bounds.
    score.div_euclid(2) - 5
}
