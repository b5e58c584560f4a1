//! Temperature → density laws.

use crate::error::{MaterialError, MaterialResult};
use pk_core::units::{Density, Temperature, kg_per_m3};

/// Closed set of density laws, all in SI (kg/m³ with T in kelvin).
#[derive(Clone, Debug, PartialEq)]
pub enum DensityModel {
    /// Temperature independent.
    Constant { rho: f64 },
    /// `rho = a + b * T`.
    Linear { a: f64, b: f64 },
    /// `rho = c0 + c1 * T + c2 * T^2 + ...`.
    Polynomial { coeffs: Vec<f64> },
}

impl DensityModel {
    pub fn constant(rho: Density) -> Self {
        DensityModel::Constant { rho: rho.value }
    }

    /// Linear law from the intercept and the slope in kg/(m³·K).
    pub fn linear(a: Density, b_kg_m3_per_k: f64) -> Self {
        DensityModel::Linear {
            a: a.value,
            b: b_kg_m3_per_k,
        }
    }

    pub fn polynomial(coeffs: Vec<f64>) -> MaterialResult<Self> {
        if coeffs.is_empty() {
            return Err(MaterialError::InvalidArg {
                what: "polynomial density law needs at least one coefficient",
            });
        }
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(MaterialError::InvalidArg {
                what: "polynomial density coefficients must be finite",
            });
        }
        Ok(DensityModel::Polynomial { coeffs })
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, DensityModel::Constant { .. })
    }

    /// Density at temperature `t`.
    pub fn density(&self, t: Temperature) -> MaterialResult<Density> {
        self.density_kg_m3(t.value).map(kg_per_m3)
    }

    /// Raw-SI density evaluation used inside right-hand sides.
    pub fn density_kg_m3(&self, t_k: f64) -> MaterialResult<f64> {
        let rho = match self {
            DensityModel::Constant { rho } => *rho,
            DensityModel::Linear { a, b } => a + b * t_k,
            // Horner
            DensityModel::Polynomial { coeffs } => {
                coeffs.iter().rev().fold(0.0, |acc, c| acc * t_k + c)
            }
        };
        if !rho.is_finite() || rho <= 0.0 {
            return Err(MaterialError::NonPhysical {
                what: "density",
                value: rho,
            });
        }
        Ok(rho)
    }
}
