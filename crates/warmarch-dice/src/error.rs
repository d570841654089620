//! Dice error types.

use thiserror::Error;

/// Errors produced by the dice engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// The input string does not match `[count]d<sides>[+|-modifier]`.
    #[error("invalid dice notation: {0:?}")]
    InvalidNotation(String),
}
