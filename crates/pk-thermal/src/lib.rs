//! pk-thermal: lumped thermal network for pointkin.
//!
//! Provides:
//! - `ThermalComponent`: a lumped thermal mass with optional heat generation,
//!   reactivity feedback coefficient, heat sink and convective links
//! - `NetworkBuilder`: collects components and validates link symmetry
//! - `ThermalNetwork`: arena of components with the temperature right-hand side
//!
//! # Example
//!
//! ```
//! use pk_core::units::{k, kw, m2, m3, w_per_m2k};
//! use pk_materials::catalog;
//! use pk_thermal::{NetworkBuilder, ThermalComponent};
//!
//! let mut fuel = ThermalComponent::new("fuel", catalog::lookup("uzrh").unwrap(), m3(0.02), k(500.0))
//!     .with_heat_generation(kw(250.0));
//! fuel.add_convection("cool", w_per_m2k(7000.0), m2(2.5));
//! let mut cool = ThermalComponent::new("cool", catalog::lookup("water").unwrap(), m3(19.0), k(500.0));
//! cool.add_convection("fuel", w_per_m2k(7000.0), m2(2.5));
//!
//! let mut builder = NetworkBuilder::new();
//! builder.add(fuel);
//! builder.add(cool);
//! let network = builder.build().unwrap();
//!
//! let mut dtdt = vec![0.0; network.len()];
//! network.derivatives(0.0, &[500.0, 500.0], 1.0, &mut dtdt).unwrap();
//! assert!(dtdt[0] > 0.0);
//! assert_eq!(dtdt[1], 0.0);
//! ```

pub mod builder;
pub mod component;
pub mod error;
pub mod network;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use component::{ComponentId, ConvectionLink, HeatRemoval, RemovalSchedule, ThermalComponent};
pub use error::{ThermalError, ThermalResult};
pub use network::{FeedbackCoefficient, ResolvedLink, ThermalNetwork};
