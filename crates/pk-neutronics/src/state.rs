//! Named view of the neutronics state vector.

use crate::error::{KineticsError, KineticsResult};

/// Normalized power plus precursor and decay-heat populations.
///
/// The flat layout used by the integrator is `[p, ζ_1..ζ_npg, ω_1..ω_ndg]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NeutronicsState {
    pub power: f64,
    pub precursors: Vec<f64>,
    pub decay_heat: Vec<f64>,
}

impl NeutronicsState {
    pub fn new(power: f64, n_pg: usize, n_dg: usize) -> Self {
        Self {
            power,
            precursors: vec![0.0; n_pg],
            decay_heat: vec![0.0; n_dg],
        }
    }

    pub fn len(&self) -> usize {
        1 + self.precursors.len() + self.decay_heat.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn flatten(&self) -> Vec<f64> {
        let mut y = Vec::with_capacity(self.len());
        y.push(self.power);
        y.extend_from_slice(&self.precursors);
        y.extend_from_slice(&self.decay_heat);
        y
    }

    pub fn from_flat(y: &[f64], n_pg: usize, n_dg: usize) -> KineticsResult<Self> {
        let expected = 1 + n_pg + n_dg;
        if y.len() != expected {
            return Err(KineticsError::StateLength {
                expected,
                actual: y.len(),
            });
        }
        Ok(Self {
            power: y[0],
            precursors: y[1..=n_pg].to_vec(),
            decay_heat: y[1 + n_pg..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_layout() {
        let s = NeutronicsState {
            power: 2.0,
            precursors: vec![3.0, 4.0],
            decay_heat: vec![5.0],
        };
        let y = s.flatten();
        assert_eq!(y, vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(NeutronicsState::from_flat(&y, 2, 1).unwrap(), s);
    }

    #[test]
    fn prompt_only_state() {
        let s = NeutronicsState::new(1.0, 0, 0);
        assert_eq!(s.len(), 1);
        assert_eq!(NeutronicsState::from_flat(&[1.0], 0, 0).unwrap(), s);
        assert!(NeutronicsState::from_flat(&[1.0, 0.0], 0, 0).is_err());
    }
}
