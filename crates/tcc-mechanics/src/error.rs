//! Error types for dice mechanics.

/// Errors that can occur while rolling dice.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A die needs at least two sides.
    #[error("invalid die: d{0} (a die needs at least 2 sides)")]
    InvalidDie(u32),

    /// Between one and [`crate::dice::MAX_DICE`] dice must be rolled.
    #[error("invalid dice count: {0} (roll between 1 and 1000 dice)")]
    InvalidCount(u32),

    /// A dice expression like `3d6+2` could not be parsed.
    #[error("invalid dice expression: \"{0}\"")]
    InvalidExpression(String),

    /// The sum of the dice and the modifier does not fit in an `i32`.
    #[error("dice total out of range: {0}")]
    TotalOutOfRange(String),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
