//! Total reactivity: external insertion plus temperature feedback.

use crate::error::{ReactivityError, ReactivityResult};
use crate::insertion::ReactivityInsertion;

/// Feedback contribution of one temperature state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackTerm {
    /// Position in the temperature vector.
    pub index: usize,
    /// α in Δk/k per K.
    pub alpha_per_k: f64,
}

/// Composes ρ_ext(t) with Σ α_j (T_j - T_j,ref).
///
/// The reference temperatures are captured once, at the feedback-activation
/// step, and reused for the rest of the run. Until then, and before
/// `t_feedback`, only the external insertion contributes.
#[derive(Debug, Clone)]
pub struct FeedbackComposer {
    insertion: ReactivityInsertion,
    terms: Vec<FeedbackTerm>,
    enabled: bool,
    t_feedback: f64,
    reference: Option<Vec<f64>>,
}

impl FeedbackComposer {
    pub fn new(
        insertion: ReactivityInsertion,
        terms: Vec<FeedbackTerm>,
        enabled: bool,
        t_feedback: f64,
    ) -> ReactivityResult<Self> {
        insertion.validate()?;
        if let Some(term) = terms.iter().find(|term| !term.alpha_per_k.is_finite()) {
            return Err(ReactivityError::NonFiniteCoefficient {
                index: term.index,
                value: term.alpha_per_k,
            });
        }
        Ok(Self {
            insertion,
            terms,
            enabled,
            t_feedback,
            reference: None,
        })
    }

    /// External insertion only; feedback disabled.
    pub fn external_only(insertion: ReactivityInsertion) -> ReactivityResult<Self> {
        Self::new(insertion, Vec::new(), false, f64::INFINITY)
    }

    pub fn insertion(&self) -> &ReactivityInsertion {
        &self.insertion
    }

    pub fn terms(&self) -> &[FeedbackTerm] {
        &self.terms
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn reference(&self) -> Option<&[f64]> {
        self.reference.as_deref()
    }

    /// Record reference temperatures. Only the first call has an effect;
    /// returns whether this call captured them.
    pub fn capture_reference(&mut self, temps: &[f64]) -> ReactivityResult<bool> {
        if self.reference.is_some() {
            return Ok(false);
        }
        if let Some(term) = self.terms.iter().find(|term| term.index >= temps.len()) {
            return Err(ReactivityError::IndexOob {
                index: term.index,
                len: temps.len(),
            });
        }
        self.reference = Some(temps.to_vec());
        Ok(true)
    }

    /// Temperature feedback Σ α_j (T_j - T_j,ref) at time `t`.
    pub fn feedback_at(&self, t: f64, temps: &[f64]) -> ReactivityResult<f64> {
        if !self.enabled || t < self.t_feedback {
            return Ok(0.0);
        }
        let Some(reference) = &self.reference else {
            return Ok(0.0);
        };
        if temps.len() != reference.len() {
            return Err(ReactivityError::StateLength {
                expected: reference.len(),
                actual: temps.len(),
            });
        }
        Ok(self
            .terms
            .iter()
            .map(|term| term.alpha_per_k * (temps[term.index] - reference[term.index]))
            .sum())
    }

    /// Total reactivity ρ_ext(t) + feedback.
    pub fn reactivity_at(&self, t: f64, temps: &[f64]) -> ReactivityResult<f64> {
        Ok(self.insertion.value_at(t) + self.feedback_at(t, temps)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer(enabled: bool) -> FeedbackComposer {
        FeedbackComposer::new(
            ReactivityInsertion::Constant { rho: 0.0005 },
            vec![FeedbackTerm {
                index: 0,
                alpha_per_k: -1.1e-5,
            }],
            enabled,
            0.5,
        )
        .unwrap()
    }

    #[test]
    fn no_feedback_before_capture() {
        let fc = composer(true);
        assert_eq!(fc.reactivity_at(1.0, &[600.0, 300.0]).unwrap(), 0.0005);
    }

    #[test]
    fn feedback_after_capture_and_activation() {
        let mut fc = composer(true);
        assert!(fc.capture_reference(&[500.0, 300.0]).unwrap());
        assert!(!fc.capture_reference(&[900.0, 300.0]).unwrap());
        assert_eq!(fc.reference(), Some(&[500.0, 300.0][..]));

        // before t_feedback the temperature term is off even with a reference
        assert_eq!(fc.reactivity_at(0.4, &[510.0, 300.0]).unwrap(), 0.0005);

        let rho = fc.reactivity_at(0.5, &[510.0, 350.0]).unwrap();
        assert!((rho - (0.0005 - 1.1e-4)).abs() < 1e-15);
    }

    #[test]
    fn disabled_composer_ignores_temperatures() {
        let mut fc = composer(false);
        assert!(!fc.is_enabled());
        fc.capture_reference(&[500.0]).unwrap();
        assert_eq!(fc.reactivity_at(5.0, &[900.0]).unwrap(), 0.0005);
    }

    #[test]
    fn capture_checks_indices() {
        let mut fc = FeedbackComposer::new(
            ReactivityInsertion::default(),
            vec![FeedbackTerm {
                index: 3,
                alpha_per_k: -1e-5,
            }],
            true,
            0.0,
        )
        .unwrap();
        assert_eq!(
            fc.capture_reference(&[500.0]).unwrap_err(),
            ReactivityError::IndexOob { index: 3, len: 1 }
        );
    }

    #[test]
    fn invalid_insertion_is_rejected_at_construction() {
        let bad = ReactivityInsertion::Ramp {
            t_start: 3.0,
            t_end: 1.0,
            rho_init: 0.0,
            rho_final: 0.001,
        };
        assert!(FeedbackComposer::external_only(bad).is_err());
    }
}
