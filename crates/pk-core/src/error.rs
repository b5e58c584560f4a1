use thiserror::Error;

pub type PkResult<T> = Result<T, PkError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PkError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A time or index lies outside the simulation interval.
    #[error("Out of domain: {what} (value={value}, allowed=[{lo}, {hi}])")]
    Domain {
        what: &'static str,
        value: f64,
        lo: f64,
        hi: f64,
    },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

impl PkError {
    /// True for errors raised by a time/index lookup outside the simulated interval.
    pub fn is_domain(&self) -> bool {
        matches!(self, PkError::Domain { .. } | PkError::IndexOob { .. })
    }
}
