//! Error types for the rules engine.

/// Contract violations raised by rules operations.
///
/// Rejected edits (an attribute that would drop below zero or blow the
/// budget) are not errors; see [`crate::rules::AdjustOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// An attribute name that is not in the catalog.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A skill name that is not in the catalog.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    /// A class name that is not in the catalog.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// A party check was requested for an empty roster.
    #[error("party check needs at least one character")]
    EmptyParty,

    /// No character in the roster matches the given id, name or index.
    #[error("no character matches '{0}'")]
    NoSuchCharacter(String),

    /// A stored or imported record has an attribute below zero.
    #[error("{attribute} is {score}; scores cannot be negative")]
    NegativeScore { attribute: String, score: i32 },

    /// A stored or imported record spends more than the attribute budget.
    #[error("attributes sum to {sum}, over the budget of {max}")]
    OverBudget { sum: i64, max: i32 },

    /// Skill points larger than a check total can hold.
    #[error("{points} point(s) in {skill} is out of range")]
    PointsOutOfRange { skill: String, points: u32 },

    /// The catalog failed to parse or is internally inconsistent.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;
