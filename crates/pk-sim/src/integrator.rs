//! Time integrators over a flat state vector.

use crate::error::{FailureReason, SimError, SimResult};
use crate::model::OdeSystem;

/// Integrator selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Embedded Dormand-Prince 5(4) with adaptive step size (default).
    #[default]
    DormandPrince,
    /// Classical RK4 with a fixed number of sub-steps per call.
    Rk4,
}

/// Options shared by the integrators.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverOptions {
    /// Relative tolerance (Dormand-Prince)
    pub rtol: f64,
    /// Absolute tolerance (Dormand-Prince)
    pub atol: f64,
    /// Maximum attempted sub-steps per call (Dormand-Prince)
    pub max_substeps: usize,
    /// Fixed sub-steps per call (RK4)
    pub rk4_substeps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-12,
            max_substeps: 1_000_000,
            rk4_substeps: 1,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.rtol.is_finite() && self.rtol > 0.0) {
            return Err(SimError::configuration("rtol must be positive"));
        }
        if !(self.atol.is_finite() && self.atol > 0.0) {
            return Err(SimError::configuration("atol must be positive"));
        }
        if self.max_substeps == 0 {
            return Err(SimError::configuration("max_substeps must be positive"));
        }
        if self.rk4_substeps == 0 {
            return Err(SimError::configuration("rk4_substeps must be positive"));
        }
        Ok(())
    }
}

/// Work done by one integrator call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evals: usize,
}

/// Trait for time integrators.
pub trait Integrator {
    /// Advance `y` in place from `t0` to `t1`.
    fn integrate<S: OdeSystem>(
        &mut self,
        system: &S,
        t0: f64,
        t1: f64,
        y: &mut [f64],
    ) -> SimResult<StepStats>;
}

fn eval<S: OdeSystem>(
    system: &S,
    t: f64,
    y: &[f64],
    out: &mut [f64],
    stats: &mut StepStats,
) -> SimResult<()> {
    system.rhs(t, y, out)?;
    stats.rhs_evals += 1;
    if out.iter().any(|v| !v.is_finite()) {
        return Err(SimError::IntegrationFailure {
            t,
            reason: FailureReason::NonFinite,
        });
    }
    Ok(())
}

/// out = y + h * Σ c_j k_j
fn combine(out: &mut [f64], y: &[f64], h: f64, terms: &[(f64, &[f64])]) {
    for (i, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (c, k) in terms {
            acc += c * k[i];
        }
        *o = y[i] + h * acc;
    }
}

/// Classical RK4 with `substeps` equal sub-steps per call.
#[derive(Clone, Debug)]
pub struct Rk4 {
    substeps: usize,
}

impl Rk4 {
    pub fn new(substeps: usize) -> Self {
        Self {
            substeps: substeps.max(1),
        }
    }
}

impl Integrator for Rk4 {
    fn integrate<S: OdeSystem>(
        &mut self,
        system: &S,
        t0: f64,
        t1: f64,
        y: &mut [f64],
    ) -> SimResult<StepStats> {
        let n = y.len();
        let mut stats = StepStats::default();
        let (mut k1, mut k2, mut k3, mut k4) = (vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n]);
        let mut tmp = vec![0.0; n];

        let h = (t1 - t0) / self.substeps as f64;
        for s in 0..self.substeps {
            let t = t0 + s as f64 * h;

            eval(system, t, y, &mut k1, &mut stats)?;
            combine(&mut tmp, y, 0.5 * h, &[(1.0, &k1[..])]);
            eval(system, t + 0.5 * h, &tmp, &mut k2, &mut stats)?;
            combine(&mut tmp, y, 0.5 * h, &[(1.0, &k2[..])]);
            eval(system, t + 0.5 * h, &tmp, &mut k3, &mut stats)?;
            combine(&mut tmp, y, h, &[(1.0, &k3[..])]);
            eval(system, t + h, &tmp, &mut k4, &mut stats)?;

            // y += h/6 (k1 + 2 k2 + 2 k3 + k4)
            combine(
                &mut tmp,
                y,
                h / 6.0,
                &[(1.0, &k1[..]), (2.0, &k2[..]), (2.0, &k3[..]), (1.0, &k4[..])],
            );
            y.copy_from_slice(&tmp);
            stats.accepted += 1;
        }
        Ok(stats)
    }
}

// Dormand-Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// 5th minus 4th order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Embedded Dormand-Prince 5(4) with adaptive step size.
///
/// The accepted step size carries over between calls, so a driver making many
/// short calls does not pay for a fresh step-size search each time.
#[derive(Clone, Debug)]
pub struct DormandPrince {
    rtol: f64,
    atol: f64,
    max_substeps: usize,
    h_next: Option<f64>,
}

impl DormandPrince {
    pub fn new(options: &SolverOptions) -> Self {
        Self {
            rtol: options.rtol,
            atol: options.atol,
            max_substeps: options.max_substeps,
            h_next: None,
        }
    }

    fn scale(&self, a: f64, b: f64) -> f64 {
        self.atol + self.rtol * a.abs().max(b.abs())
    }

    /// RMS norm of `v` scaled by the tolerances at `y`.
    fn norm(&self, v: &[f64], y: &[f64]) -> f64 {
        if v.is_empty() {
            return 0.0;
        }
        let sum: f64 = v
            .iter()
            .zip(y)
            .map(|(v, y)| {
                let r = v / self.scale(*y, *y);
                r * r
            })
            .sum();
        (sum / v.len() as f64).sqrt()
    }

    /// Starting step size estimate (Hairer, Nørsett & Wanner, II.4).
    fn initial_step<S: OdeSystem>(
        &self,
        system: &S,
        t: f64,
        y: &[f64],
        f0: &[f64],
        stats: &mut StepStats,
    ) -> SimResult<f64> {
        let d0 = self.norm(y, y);
        let d1 = self.norm(f0, y);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };

        let mut y1 = vec![0.0; y.len()];
        combine(&mut y1, y, h0, &[(1.0, f0)]);
        let mut f1 = vec![0.0; y.len()];
        eval(system, t + h0, &y1, &mut f1, stats)?;

        let diff: Vec<f64> = f1.iter().zip(f0).map(|(a, b)| a - b).collect();
        let d2 = self.norm(&diff, y) / h0;

        let h1 = if d1.max(d2) <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(0.2)
        };
        Ok((100.0 * h0).min(h1))
    }
}

impl Integrator for DormandPrince {
    fn integrate<S: OdeSystem>(
        &mut self,
        system: &S,
        t0: f64,
        t1: f64,
        y: &mut [f64],
    ) -> SimResult<StepStats> {
        let n = y.len();
        let mut stats = StepStats::default();
        if t1 <= t0 || n == 0 {
            return Ok(stats);
        }

        let mut k = [(); 7].map(|_| vec![0.0; n]);
        let mut tmp = vec![0.0; n];
        let mut y_new = vec![0.0; n];
        let mut err = vec![0.0; n];

        let mut t = t0;
        eval(system, t, y, &mut k[0], &mut stats)?;

        let mut h = match self.h_next {
            Some(h) => h,
            None => self.initial_step(system, t, y, &k[0], &mut stats)?,
        };
        let mut attempts = 0usize;
        let mut rejected_last = false;

        while t < t1 {
            if attempts >= self.max_substeps {
                return Err(SimError::IntegrationFailure {
                    t,
                    reason: FailureReason::SubstepLimit {
                        limit: self.max_substeps,
                    },
                });
            }
            if h < 16.0 * f64::EPSILON * t.abs().max(1.0) {
                return Err(SimError::IntegrationFailure {
                    t,
                    reason: FailureReason::StepUnderflow { h },
                });
            }
            attempts += 1;

            let last = t + h >= t1;
            let h_try = if last { t1 - t } else { h };

            let [k1, k2, k3, k4, k5, k6, k7] = &mut k;
            combine(&mut tmp, y, h_try, &[(A21, &k1[..])]);
            eval(system, t + C2 * h_try, &tmp, k2, &mut stats)?;
            combine(&mut tmp, y, h_try, &[(A31, &k1[..]), (A32, &k2[..])]);
            eval(system, t + C3 * h_try, &tmp, k3, &mut stats)?;
            combine(&mut tmp, y, h_try, &[(A41, &k1[..]), (A42, &k2[..]), (A43, &k3[..])]);
            eval(system, t + C4 * h_try, &tmp, k4, &mut stats)?;
            combine(
                &mut tmp,
                y,
                h_try,
                &[(A51, &k1[..]), (A52, &k2[..]), (A53, &k3[..]), (A54, &k4[..])],
            );
            eval(system, t + C5 * h_try, &tmp, k5, &mut stats)?;
            combine(
                &mut tmp,
                y,
                h_try,
                &[(A61, &k1[..]), (A62, &k2[..]), (A63, &k3[..]), (A64, &k4[..]), (A65, &k5[..])],
            );
            eval(system, t + h_try, &tmp, k6, &mut stats)?;
            combine(
                &mut y_new,
                y,
                h_try,
                &[(A71, &k1[..]), (A73, &k3[..]), (A74, &k4[..]), (A75, &k5[..]), (A76, &k6[..])],
            );
            eval(system, t + h_try, &y_new, k7, &mut stats)?;

            for (i, e) in err.iter_mut().enumerate() {
                *e = h_try
                    * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
            }
            let err_norm = {
                let sum: f64 = err
                    .iter()
                    .zip(y.iter().zip(&y_new))
                    .map(|(e, (a, b))| {
                        let r = e / self.scale(*a, *b);
                        r * r
                    })
                    .sum();
                (sum / n as f64).sqrt()
            };

            let factor = if err_norm == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * err_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            if err_norm <= 1.0 {
                t = if last { t1 } else { t + h_try };
                y.copy_from_slice(&y_new);
                // first-same-as-last
                std::mem::swap(k1, k7);
                stats.accepted += 1;

                let grow = if rejected_last { factor.min(1.0) } else { factor };
                let proposed = h_try * grow;
                // a shortened final step says nothing about the next interval
                h = if last { proposed.max(h) } else { proposed };
                rejected_last = false;
            } else {
                h = h_try * factor;
                stats.rejected += 1;
                rejected_last = true;
            }
        }

        self.h_next = Some(h);
        Ok(stats)
    }
}

/// Integrator picked at run time.
#[derive(Clone, Debug)]
pub enum Stepper {
    DormandPrince(DormandPrince),
    Rk4(Rk4),
}

impl Stepper {
    pub fn new(kind: IntegratorType, options: &SolverOptions) -> Self {
        match kind {
            IntegratorType::DormandPrince => Stepper::DormandPrince(DormandPrince::new(options)),
            IntegratorType::Rk4 => Stepper::Rk4(Rk4::new(options.rk4_substeps)),
        }
    }
}

impl Integrator for Stepper {
    fn integrate<S: OdeSystem>(
        &mut self,
        system: &S,
        t0: f64,
        t1: f64,
        y: &mut [f64],
    ) -> SimResult<StepStats> {
        match self {
            Stepper::DormandPrince(dp) => dp.integrate(system, t0, t1, y),
            Stepper::Rk4(rk4) => rk4.integrate(system, t0, t1, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dy/dt = -k y
    struct Decay(f64);

    impl OdeSystem for Decay {
        fn dim(&self) -> usize {
            1
        }

        fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) -> SimResult<()> {
            dydt[0] = -self.0 * y[0];
            Ok(())
        }
    }

    /// Harmonic oscillator at angular frequency w.
    struct Oscillator(f64);

    impl OdeSystem for Oscillator {
        fn dim(&self) -> usize {
            2
        }

        fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) -> SimResult<()> {
            dydt[0] = y[1];
            dydt[1] = -self.0 * self.0 * y[0];
            Ok(())
        }
    }

    struct Poisoned;

    impl OdeSystem for Poisoned {
        fn dim(&self) -> usize {
            1
        }

        fn rhs(&self, t: f64, _y: &[f64], dydt: &mut [f64]) -> SimResult<()> {
            dydt[0] = if t > 0.5 { f64::NAN } else { 1.0 };
            Ok(())
        }
    }

    #[test]
    fn dormand_prince_tracks_exponential() {
        let mut dp = DormandPrince::new(&SolverOptions::default());
        let mut y = [1.0];
        let stats = dp.integrate(&Decay(2.0), 0.0, 1.0, &mut y).unwrap();
        assert!((y[0] - (-2.0f64).exp()).abs() < 1e-6);
        assert!(stats.accepted > 0);
    }

    #[test]
    fn dormand_prince_lands_on_interval_end_across_calls() {
        let mut dp = DormandPrince::new(&SolverOptions::default());
        let mut y = [1.0, 0.0];
        let w = 2.0 * std::f64::consts::PI;
        for i in 0..100 {
            let t0 = i as f64 * 0.01;
            dp.integrate(&Oscillator(w), t0, t0 + 0.01, &mut y).unwrap();
        }
        // one full period
        assert!((y[0] - 1.0).abs() < 1e-4);
        assert!(y[1].abs() < 1e-3);
    }

    #[test]
    fn substep_cap_is_enforced() {
        let opts = SolverOptions {
            rtol: 1e-12,
            atol: 1e-14,
            max_substeps: 3,
            ..SolverOptions::default()
        };
        let mut dp = DormandPrince::new(&opts);
        let mut y = [1.0, 0.0];
        let err = dp
            .integrate(&Oscillator(50.0), 0.0, 10.0, &mut y)
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::IntegrationFailure {
                reason: FailureReason::SubstepLimit { limit: 3 },
                ..
            }
        ));
    }

    #[test]
    fn non_finite_derivative_fails() {
        let mut dp = DormandPrince::new(&SolverOptions::default());
        let mut y = [0.0];
        let err = dp.integrate(&Poisoned, 0.0, 1.0, &mut y).unwrap_err();
        assert!(matches!(
            err,
            SimError::IntegrationFailure {
                reason: FailureReason::NonFinite,
                ..
            }
        ));

        let mut rk4 = Rk4::new(4);
        let mut y = [0.0];
        assert!(rk4.integrate(&Poisoned, 0.0, 1.0, &mut y).is_err());
    }

    #[test]
    fn rk4_is_fourth_order() {
        let mut coarse = Rk4::new(10);
        let mut fine = Rk4::new(20);
        let (mut a, mut b) = ([1.0], [1.0]);
        coarse.integrate(&Decay(1.0), 0.0, 1.0, &mut a).unwrap();
        fine.integrate(&Decay(1.0), 0.0, 1.0, &mut b).unwrap();
        let exact = (-1.0f64).exp();
        let ratio = (a[0] - exact).abs() / (b[0] - exact).abs();
        assert!(ratio > 12.0 && ratio < 20.0, "ratio {ratio}");
    }

    #[test]
    fn options_validation() {
        assert!(SolverOptions::default().validate().is_ok());
        let bad = SolverOptions {
            max_substeps: 0,
            ..SolverOptions::default()
        };
        assert!(matches!(bad.validate(), Err(SimError::Configuration { .. })));
    }

    #[test]
    fn stepper_dispatches_on_type() {
        let opts = SolverOptions::default();
        assert!(matches!(
            Stepper::new(IntegratorType::default(), &opts),
            Stepper::DormandPrince(_)
        ));
        let mut rk4 = Stepper::new(IntegratorType::Rk4, &opts);
        let mut y = [1.0];
        let stats = rk4.integrate(&Decay(1.0), 0.0, 0.1, &mut y).unwrap();
        assert_eq!(stats.rhs_evals, 4);
    }
}
