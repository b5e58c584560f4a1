//! Thermal network error types.

use pk_materials::MaterialError;
use thiserror::Error;

pub type ThermalResult<T> = Result<T, ThermalError>;

/// Network construction and evaluation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermalError {
    /// The network holds no components.
    #[error("Thermal network has no components")]
    Empty,

    /// Two components share a name.
    #[error("Duplicate component name: {name}")]
    DuplicateName { name: String },

    /// A link names a component that doesn't exist.
    #[error("Component {component} convects with unknown component {neighbor}")]
    UnknownNeighbor { component: String, neighbor: String },

    /// A component declares a link to itself.
    #[error("Component {component} declares a convection link to itself")]
    SelfLink { component: String },

    /// The same neighbor is declared twice on one component.
    #[error("Component {component} declares more than one link to {neighbor}")]
    DuplicateLink { component: String, neighbor: String },

    /// `A -> B` is declared but `B -> A` is not.
    #[error("Component {component} convects with {neighbor}, but {neighbor} declares no link back")]
    MissingReciprocal { component: String, neighbor: String },

    /// `A -> B` and `B -> A` disagree on h·A.
    #[error(
        "Asymmetric link {component} <-> {neighbor}: hA = {forward_w_per_k} W/K vs {reverse_w_per_k} W/K"
    )]
    AsymmetricLink {
        component: String,
        neighbor: String,
        forward_w_per_k: f64,
        reverse_w_per_k: f64,
    },

    /// Out-of-range parameter on a component.
    #[error("Invalid parameter on component {component}: {what}")]
    InvalidParameter {
        component: String,
        what: &'static str,
    },

    /// Material property evaluation failed.
    #[error("Material error on component {component}: {source}")]
    Material {
        component: String,
        source: MaterialError,
    },

    /// Temperature/derivative slice does not match the network size.
    #[error("State length mismatch: expected {expected}, got {actual}")]
    StateLength { expected: usize, actual: usize },
}

impl ThermalError {
    /// True for errors that can only come from a malformed network definition.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            ThermalError::Material { .. } | ThermalError::StateLength { .. }
        )
    }
}
