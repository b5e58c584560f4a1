//! Fixed-width simulation time grid.
//!
//! Every history in a run is indexed by the step numbers handed out here, so the
//! time → index mapping has to be identical for the neutronics and thermal sides.

use crate::error::{PkError, PkResult};
use crate::numeric::{ensure_finite, ensure_positive};
use crate::units::Time;

/// Fraction of a step absorbed when converting a time into a step index.
///
/// Keeps lookups such as `0.0015 / 0.0005 = 2.9999999999999996` on step 3.
const STEP_GUARD: f64 = 1e-9;

/// Immutable discretization of `[t0, tf]` into steps of width `dt`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    t0_s: f64,
    tf_s: f64,
    dt_s: f64,
    t_feedback_s: f64,
    steps: usize,
}

impl Timer {
    /// Build a grid from uom times.
    pub fn new(t0: Time, tf: Time, dt: Time, t_feedback: Time) -> PkResult<Self> {
        Self::from_seconds(t0.value, tf.value, dt.value, t_feedback.value)
    }

    /// Build a grid from raw seconds.
    pub fn from_seconds(t0_s: f64, tf_s: f64, dt_s: f64, t_feedback_s: f64) -> PkResult<Self> {
        let t0_s = ensure_finite(t0_s, "t0")?;
        let tf_s = ensure_finite(tf_s, "tf")?;
        let dt_s = ensure_positive(dt_s, "dt must be positive")?;
        let t_feedback_s = ensure_finite(t_feedback_s, "t_feedback")?;

        if t0_s >= tf_s {
            return Err(PkError::InvalidArg {
                what: "t0 must be strictly less than tf",
            });
        }
        if t_feedback_s < t0_s || t_feedback_s > tf_s {
            return Err(PkError::Domain {
                what: "t_feedback",
                value: t_feedback_s,
                lo: t0_s,
                hi: tf_s,
            });
        }

        let spans = ((tf_s - t0_s) / dt_s - STEP_GUARD).ceil();
        let steps = spans.max(0.0) as usize + 1;

        Ok(Self {
            t0_s,
            tf_s,
            dt_s,
            t_feedback_s,
            steps,
        })
    }

    pub fn t0(&self) -> f64 {
        self.t0_s
    }

    pub fn tf(&self) -> f64 {
        self.tf_s
    }

    pub fn dt(&self) -> f64 {
        self.dt_s
    }

    pub fn t_feedback(&self) -> f64 {
        self.t_feedback_s
    }

    /// Total number of grid points, including `t0`.
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Step index for time `t` (floor on `(t - t0)/dt`), clamped to the last step.
    ///
    /// Fails when `t` lies more than one step width outside `[t0, tf]`.
    pub fn index_of(&self, t: f64) -> PkResult<usize> {
        let lo = self.t0_s - self.dt_s;
        let hi = self.tf_s + self.dt_s;
        if !t.is_finite() || t < lo || t > hi {
            return Err(PkError::Domain {
                what: "time lookup",
                value: t,
                lo,
                hi,
            });
        }
        let raw = ((t - self.t0_s) / self.dt_s + STEP_GUARD).floor();
        if raw <= 0.0 {
            return Ok(0);
        }
        Ok((raw as usize).min(self.steps - 1))
    }

    /// Time of grid point `index`.
    pub fn time_at(&self, index: usize) -> PkResult<f64> {
        if index >= self.steps {
            return Err(PkError::IndexOob {
                what: "time grid",
                index,
                len: self.steps,
            });
        }
        Ok(self.t0_s + index as f64 * self.dt_s)
    }

    /// Step at which temperature feedback switches on.
    pub fn feedback_index(&self) -> usize {
        // t_feedback is validated to lie in [t0, tf]
        let raw = ((self.t_feedback_s - self.t0_s) / self.dt_s + STEP_GUARD).floor();
        (raw.max(0.0) as usize).min(self.steps - 1)
    }

    /// All grid times in order.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.steps).map(move |i| self.t0_s + i as f64 * self.dt_s)
    }
}
