//! Error types for simulation operations.

use thiserror::Error;

/// Why an ODE call gave up.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// More internal sub-steps than allowed in one call.
    SubstepLimit { limit: usize },
    /// Adaptive step size shrank below floating-point resolution of `t`.
    StepUnderflow { h: f64 },
    /// The right-hand side produced NaN or infinity.
    NonFinite,
    /// The model rejected a state while evaluating its right-hand side.
    Model { message: String },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::SubstepLimit { limit } => {
                write!(f, "exceeded {limit} internal sub-steps")
            }
            FailureReason::StepUnderflow { h } => write!(f, "step size underflow (h = {h:e})"),
            FailureReason::NonFinite => f.write_str("non-finite derivative"),
            FailureReason::Model { message } => write!(f, "model error: {message}"),
        }
    }
}

/// Errors encountered while building or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid setup; raised before any step is taken.
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    /// A time or index outside the simulated interval.
    #[error("Domain error: {what}")]
    Domain { what: String },

    /// An ODE call failed to reach the end of its interval.
    #[error("Integration failure at t = {t} s: {reason}")]
    IntegrationFailure { t: f64, reason: FailureReason },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub fn configuration(what: impl Into<String>) -> Self {
        SimError::Configuration { what: what.into() }
    }

    pub fn is_integration_failure(&self) -> bool {
        matches!(self, SimError::IntegrationFailure { .. })
    }
}

impl From<pk_core::PkError> for SimError {
    fn from(e: pk_core::PkError) -> Self {
        if e.is_domain() {
            SimError::Domain {
                what: e.to_string(),
            }
        } else {
            SimError::Configuration {
                what: e.to_string(),
            }
        }
    }
}

impl From<pk_thermal::ThermalError> for SimError {
    fn from(e: pk_thermal::ThermalError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}

impl From<pk_neutronics::KineticsError> for SimError {
    fn from(e: pk_neutronics::KineticsError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}

impl From<pk_reactivity::ReactivityError> for SimError {
    fn from(e: pk_reactivity::ReactivityError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}
