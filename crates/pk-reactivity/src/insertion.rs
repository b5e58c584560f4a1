//! Time-dependent external reactivity.

use core::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{ReactivityError, ReactivityResult};

/// External reactivity (Δk/k) as a pure function of time.
///
/// Windows are closed on both ends. Outside its window every shape returns its
/// baseline, so evaluation never fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReactivityInsertion {
    Constant {
        rho: f64,
    },
    /// `rho_init` before `t_step`, `rho_final` from `t_step` on.
    Step {
        #[serde(rename = "t_step_s")]
        t_step: f64,
        rho_init: f64,
        rho_final: f64,
    },
    /// `rho_max` on `[t_start, t_end]`, `rho_init` elsewhere.
    Impulse {
        #[serde(rename = "t_start_s")]
        t_start: f64,
        #[serde(rename = "t_end_s")]
        t_end: f64,
        rho_init: f64,
        rho_max: f64,
    },
    /// Linear from `rho_init` to `rho_final` across the window; holds `rho_final` after.
    Ramp {
        #[serde(rename = "t_start_s")]
        t_start: f64,
        #[serde(rename = "t_end_s")]
        t_end: f64,
        rho_init: f64,
        rho_final: f64,
    },
    /// `rho_init + amplitude · sin(2π f (t - t_start))` inside the window.
    Sinusoid {
        #[serde(rename = "t_start_s")]
        t_start: f64,
        #[serde(rename = "t_end_s")]
        t_end: f64,
        rho_init: f64,
        amplitude: f64,
        frequency_hz: f64,
    },
}

impl Default for ReactivityInsertion {
    fn default() -> Self {
        ReactivityInsertion::Constant { rho: 0.0 }
    }
}

impl ReactivityInsertion {
    pub fn shape(&self) -> &'static str {
        match self {
            ReactivityInsertion::Constant { .. } => "constant",
            ReactivityInsertion::Step { .. } => "step",
            ReactivityInsertion::Impulse { .. } => "impulse",
            ReactivityInsertion::Ramp { .. } => "ramp",
            ReactivityInsertion::Sinusoid { .. } => "sinusoid",
        }
    }

    /// Check parameters once, before any evaluation.
    pub fn validate(&self) -> ReactivityResult<()> {
        let invalid = |what| ReactivityError::InvalidInsertion {
            shape: self.shape(),
            what,
        };
        let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());

        match *self {
            ReactivityInsertion::Constant { rho } => {
                if !rho.is_finite() {
                    return Err(invalid("reactivity must be finite"));
                }
            }
            ReactivityInsertion::Step {
                t_step,
                rho_init,
                rho_final,
            } => {
                if !finite(&[t_step, rho_init, rho_final]) {
                    return Err(invalid("parameters must be finite"));
                }
            }
            ReactivityInsertion::Impulse {
                t_start,
                t_end,
                rho_init,
                rho_max: rho_other,
            }
            | ReactivityInsertion::Ramp {
                t_start,
                t_end,
                rho_init,
                rho_final: rho_other,
            } => {
                if !finite(&[t_start, t_end, rho_init, rho_other]) {
                    return Err(invalid("parameters must be finite"));
                }
                if t_start > t_end {
                    return Err(invalid("window start must not follow its end"));
                }
            }
            ReactivityInsertion::Sinusoid {
                t_start,
                t_end,
                rho_init,
                amplitude,
                frequency_hz,
            } => {
                if !finite(&[t_start, t_end, rho_init, amplitude, frequency_hz]) {
                    return Err(invalid("parameters must be finite"));
                }
                if t_start > t_end {
                    return Err(invalid("window start must not follow its end"));
                }
                if frequency_hz < 0.0 {
                    return Err(invalid("frequency must be non-negative"));
                }
            }
        }
        Ok(())
    }

    /// Reactivity at time `t` in seconds.
    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            ReactivityInsertion::Constant { rho } => rho,
            ReactivityInsertion::Step {
                t_step,
                rho_init,
                rho_final,
            } => {
                if t < t_step {
                    rho_init
                } else {
                    rho_final
                }
            }
            ReactivityInsertion::Impulse {
                t_start,
                t_end,
                rho_init,
                rho_max,
            } => {
                if (t_start..=t_end).contains(&t) {
                    rho_max
                } else {
                    rho_init
                }
            }
            ReactivityInsertion::Ramp {
                t_start,
                t_end,
                rho_init,
                rho_final,
            } => {
                if t < t_start {
                    rho_init
                } else if t >= t_end {
                    rho_final
                } else {
                    let frac = (t - t_start) / (t_end - t_start);
                    rho_init + frac * (rho_final - rho_init)
                }
            }
            ReactivityInsertion::Sinusoid {
                t_start,
                t_end,
                rho_init,
                amplitude,
                frequency_hz,
            } => {
                if (t_start..=t_end).contains(&t) {
                    rho_init + amplitude * (2.0 * PI * frequency_hz * (t - t_start)).sin()
                } else {
                    rho_init
                }
            }
        }
    }
}
