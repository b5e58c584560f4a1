//! pk-materials: solid and coolant property providers for pointkin.
//!
//! Provides:
//! - `DensityModel`: closed set of temperature → density laws
//! - `Material`: named bundle of conductivity, specific heat and density law
//! - a catalog of the materials used by reactor scenarios (fuel, coolants, moderators)
//!
//! # Example
//!
//! ```
//! use pk_core::units::k;
//! use pk_materials::catalog;
//!
//! let water = catalog::lookup("water").unwrap();
//! let rho = water.density(k(500.0)).unwrap();
//! assert_eq!(rho.value, 1000.0);
//! ```

pub mod catalog;
pub mod density;
pub mod error;
pub mod material;

// Re-exports for ergonomics
pub use catalog::{MaterialCatalogEntry, filter_material_catalog, lookup, material_catalog};
pub use density::DensityModel;
pub use error::{MaterialError, MaterialResult};
pub use material::Material;
