//! Material property errors.

use pk_core::PkError;
use thiserror::Error;

/// Result type for material operations.
pub type MaterialResult<T> = Result<T, MaterialError>;

/// Errors that can occur while building or querying materials.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// Non-physical values (negative density, zero heat capacity, ...).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// No catalog entry for the requested id.
    #[error("Unknown material: {id}")]
    UnknownMaterial { id: String },
}

impl From<PkError> for MaterialError {
    fn from(err: PkError) -> Self {
        match err {
            PkError::NonFinite { what, value } => MaterialError::NonPhysical { what, value },
            PkError::InvalidArg { what } => MaterialError::InvalidArg { what },
            PkError::Domain { what, .. } | PkError::IndexOob { what, .. } => {
                MaterialError::InvalidArg { what }
            }
        }
    }
}
