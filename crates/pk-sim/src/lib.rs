//! Coupled time marching for pointkin.
//!
//! Provides:
//! - `OdeSystem`: flat-state right-hand side contract
//! - Dormand-Prince 5(4) adaptive and fixed-step RK4 integrators
//! - `Simulation`: the staggered neutronics/thermal driver with its history

pub mod error;
pub mod history;
pub mod integrator;
pub mod model;
pub mod sim;

// Re-exports for public API
pub use error::{FailureReason, SimError, SimResult};
pub use history::{HistoryRow, SimulationHistory};
pub use integrator::{
    DormandPrince, Integrator, IntegratorType, Rk4, SolverOptions, StepStats, Stepper,
};
pub use model::OdeSystem;
pub use sim::{RunState, SimOutcome, SimProgress, Simulation, SimulationSetup};
