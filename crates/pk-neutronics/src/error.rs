//! Kinetics error types.

use thiserror::Error;

pub type KineticsResult<T> = Result<T, KineticsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KineticsError {
    #[error("Unknown isotope: {name}")]
    UnknownIsotope { name: String },

    #[error("Unknown neutron spectrum: {name}")]
    UnknownSpectrum { name: String },

    #[error("No kinetics data for {isotope} in the {spectrum} spectrum")]
    NoData { isotope: String, spectrum: String },

    #[error("Requested {requested} {what} groups, table holds {available}")]
    TooManyGroups {
        what: &'static str,
        requested: usize,
        available: usize,
    },

    #[error("Invalid kinetics constant {what}: {value}")]
    InvalidConstant { what: &'static str, value: f64 },

    #[error("State length mismatch: expected {expected}, got {actual}")]
    StateLength { expected: usize, actual: usize },
}
