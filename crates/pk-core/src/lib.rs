//! pk-core: stable foundation for pointkin.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - timer (fixed-width simulation time grid)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timer;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PkError, PkResult};
pub use numeric::*;
pub use timer::Timer;
pub use units::*;
