//! pk-neutronics: point-kinetics model for pointkin.
//!
//! Provides:
//! - reference delayed-neutron and decay-heat tables keyed by isotope and spectrum
//! - contiguous group collapse of those tables
//! - `Neutronics`: the point-kinetics right-hand side over a flat state vector
//! - `NeutronicsState`: named view of power, precursor and decay-heat populations
//!
//! # Example
//!
//! ```
//! use pk_neutronics::{Isotope, Neutronics, PrecursorInit, Spectrum};
//!
//! let kin = Neutronics::new(Isotope::U235, Spectrum::Thermal, 6, 0).unwrap();
//! let y = kin.initial_state(1.0, PrecursorInit::Equilibrium).flatten();
//! let mut dydt = vec![0.0; y.len()];
//! kin.rhs(0.0, &y, &mut dydt).unwrap();
//! assert!(dydt[0].abs() < 1e-9);
//! ```

pub mod data;
pub mod error;
pub mod kinetics;
pub mod state;

// Re-exports for ergonomics
pub use data::{GroupConstants, Isotope, Spectrum};
pub use error::{KineticsError, KineticsResult};
pub use kinetics::{Neutronics, PrecursorInit};
pub use state::NeutronicsState;
