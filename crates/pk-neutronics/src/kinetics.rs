//! Point-kinetics equations.
//!
//! ```text
//! dp/dt   = (ρ - β)/Λ · p + Σ λ_i ζ_i
//! dζ_i/dt = β_i/Λ · p - λ_i ζ_i
//! dω_k/dt = κ_k · p - λ_k ω_k
//! ```

use pk_core::units::{Time, s};

use crate::data::{self, GroupConstants, Isotope, Spectrum};
use crate::error::{KineticsError, KineticsResult};
use crate::state::NeutronicsState;

/// How precursor and decay-heat populations start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrecursorInit {
    /// All populations zero; the reactor starts with no delayed-neutron inventory.
    #[default]
    Zero,
    /// Steady-state populations for the initial power.
    Equilibrium,
}

/// Immutable kinetics constants and the point-kinetics right-hand side.
#[derive(Debug, Clone)]
pub struct Neutronics {
    precursors: GroupConstants,
    decay_heat: GroupConstants,
    /// Λ in seconds.
    gen_time: f64,
    beta_total: f64,
    kappa_total: f64,
}

impl Neutronics {
    /// Constants for `isotope`/`spectrum` with `n_pg` precursor and `n_dg` decay-heat groups.
    pub fn new(
        isotope: Isotope,
        spectrum: Spectrum,
        n_pg: usize,
        n_dg: usize,
    ) -> KineticsResult<Self> {
        Self::from_constants(
            data::delayed_neutrons(isotope, spectrum, n_pg)?,
            data::decay_heat(n_dg)?,
            s(spectrum.generation_time_s()),
        )
    }

    /// Build from explicit group constants.
    pub fn from_constants(
        precursors: GroupConstants,
        decay_heat: GroupConstants,
        generation_time: Time,
    ) -> KineticsResult<Self> {
        let gen_time = generation_time.value;
        if !(gen_time.is_finite() && gen_time > 0.0) {
            return Err(KineticsError::InvalidConstant {
                what: "generation time",
                value: gen_time,
            });
        }
        for (what, groups) in [("precursor", &precursors), ("decay heat", &decay_heat)] {
            if groups.yields.len() != groups.lambdas.len() {
                return Err(KineticsError::StateLength {
                    expected: groups.yields.len(),
                    actual: groups.lambdas.len(),
                });
            }
            if let Some(&y) = groups.yields.iter().find(|y| !(y.is_finite() && **y >= 0.0)) {
                return Err(KineticsError::InvalidConstant { what, value: y });
            }
            if let Some(&l) = groups.lambdas.iter().find(|l| !(l.is_finite() && **l > 0.0)) {
                return Err(KineticsError::InvalidConstant { what, value: l });
            }
        }

        Ok(Self {
            beta_total: precursors.total_yield(),
            kappa_total: decay_heat.total_yield(),
            precursors,
            decay_heat,
            gen_time,
        })
    }

    pub fn precursor_groups(&self) -> usize {
        self.precursors.len()
    }

    pub fn decay_heat_groups(&self) -> usize {
        self.decay_heat.len()
    }

    /// Length of the flat state vector.
    pub fn state_len(&self) -> usize {
        1 + self.precursors.len() + self.decay_heat.len()
    }

    pub fn precursor_constants(&self) -> &GroupConstants {
        &self.precursors
    }

    pub fn decay_heat_constants(&self) -> &GroupConstants {
        &self.decay_heat
    }

    pub fn generation_time(&self) -> Time {
        s(self.gen_time)
    }

    /// Σ β_i over the tracked groups (0 for prompt-only kinetics).
    pub fn beta_total(&self) -> f64 {
        self.beta_total
    }

    /// Initial state at normalized power `p0`.
    pub fn initial_state(&self, p0: f64, init: PrecursorInit) -> NeutronicsState {
        match init {
            PrecursorInit::Zero => {
                NeutronicsState::new(p0, self.precursors.len(), self.decay_heat.len())
            }
            PrecursorInit::Equilibrium => self.equilibrium(p0),
        }
    }

    /// Steady state at power `p0` and zero reactivity.
    pub fn equilibrium(&self, p0: f64) -> NeutronicsState {
        let precursors = self
            .precursors
            .yields
            .iter()
            .zip(&self.precursors.lambdas)
            .map(|(beta, lambda)| beta * p0 / (self.gen_time * lambda))
            .collect();
        let decay_heat = self
            .decay_heat
            .yields
            .iter()
            .zip(&self.decay_heat.lambdas)
            .map(|(kappa, lambda)| kappa * p0 / lambda)
            .collect();
        NeutronicsState {
            power: p0,
            precursors,
            decay_heat,
        }
    }

    fn check_len(&self, actual: usize) -> KineticsResult<()> {
        let expected = self.state_len();
        if actual != expected {
            return Err(KineticsError::StateLength { expected, actual });
        }
        Ok(())
    }

    /// dp/dt for power `p`, reactivity `rho` and precursor populations `zetas`.
    pub fn dpdt(&self, rho: f64, p: f64, zetas: &[f64]) -> f64 {
        let delayed: f64 = self
            .precursors
            .lambdas
            .iter()
            .zip(zetas)
            .map(|(lambda, zeta)| lambda * zeta)
            .sum();
        (rho - self.beta_total) / self.gen_time * p + delayed
    }

    /// Derivative of the flat state `y` under reactivity `rho`.
    pub fn rhs(&self, rho: f64, y: &[f64], dydt: &mut [f64]) -> KineticsResult<()> {
        self.check_len(y.len())?;
        self.check_len(dydt.len())?;

        let n_pg = self.precursors.len();
        let p = y[0];
        let zetas = &y[1..=n_pg];
        let omegas = &y[1 + n_pg..];

        dydt[0] = self.dpdt(rho, p, zetas);

        let (dzeta, domega) = dydt[1..].split_at_mut(n_pg);
        for (i, out) in dzeta.iter_mut().enumerate() {
            let beta = self.precursors.yields[i];
            let lambda = self.precursors.lambdas[i];
            *out = beta / self.gen_time * p - lambda * zetas[i];
        }
        for (k, out) in domega.iter_mut().enumerate() {
            let kappa = self.decay_heat.yields[k];
            let lambda = self.decay_heat.lambdas[k];
            *out = kappa * p - lambda * omegas[k];
        }
        Ok(())
    }

    /// Normalized heating rate seen by heat-generating components.
    ///
    /// Prompt fission heat `(1 - Σκ)·p` plus decay heat `Σ λ_k ω_k`; equal to `p`
    /// when no decay-heat groups are tracked and at equilibrium.
    pub fn thermal_power(&self, y: &[f64]) -> KineticsResult<f64> {
        self.check_len(y.len())?;
        let p = y[0];
        if self.decay_heat.is_empty() {
            return Ok(p);
        }
        let omegas = &y[1 + self.precursors.len()..];
        let decay: f64 = self
            .decay_heat
            .lambdas
            .iter()
            .zip(omegas)
            .map(|(lambda, omega)| lambda * omega)
            .sum();
        Ok((1.0 - self.kappa_total) * p + decay)
    }
}
