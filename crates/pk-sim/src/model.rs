//! OdeSystem trait for the subsystems the driver advances.

use crate::error::SimResult;

/// A first-order system dy/dt = f(t, y) over a flat `f64` state.
///
/// Implementations write every entry of `dydt`; they must not keep state
/// between calls, since an adaptive integrator evaluates rejected trial points.
pub trait OdeSystem {
    /// Length of the state vector.
    fn dim(&self) -> usize;

    /// Evaluate dy/dt at `(t, y)` into `dydt`.
    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> SimResult<()>;
}
