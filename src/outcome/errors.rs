use thiserror::Error;

/// A malformed outcome table. Raised when the table is built, never per draw.
#[derive(Debug, Error, PartialEq)]
pub enum OutcomeTableError {
    #[error("Outcome table has no entries")]
    Empty,

    #[error("Outcome '{label}' has invalid weight {weight}")]
    InvalidWeight { label: String, weight: f64 },

    #[error("Outcome table weights sum to zero")]
    ZeroTotalWeight,

    #[error("Outcome table rejected by sampler: {0}")]
    Sampler(String),
}
