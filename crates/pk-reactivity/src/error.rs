//! Error types for reactivity evaluation.

use thiserror::Error;

pub type ReactivityResult<T> = Result<T, ReactivityError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReactivityError {
    /// Insertion parameter is non-finite or out of order.
    #[error("Invalid {shape} insertion: {what}")]
    InvalidInsertion {
        shape: &'static str,
        what: &'static str,
    },

    /// A feedback coefficient is non-finite.
    #[error("Non-finite feedback coefficient on state {index}: {value}")]
    NonFiniteCoefficient { index: usize, value: f64 },

    /// A feedback term points past the temperature vector.
    #[error("Feedback term for state {index} outside temperature vector of length {len}")]
    IndexOob { index: usize, len: usize },

    /// Temperature vector length changed after the reference was captured.
    #[error("Temperature vector length mismatch: expected {expected}, got {actual}")]
    StateLength { expected: usize, actual: usize },
}
