//! Named material with its thermal properties.

use crate::density::DensityModel;
use crate::error::{MaterialError, MaterialResult};
use pk_core::units::{Density, SpecificHeat, Temperature, ThermalConductivity};

/// Immutable property bundle for one substance.
///
/// Conductivity and specific heat are constant; density follows `DensityModel`.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    name: String,
    k: ThermalConductivity,
    cp: SpecificHeat,
    density: DensityModel,
}

impl Material {
    pub fn new(
        name: impl Into<String>,
        k: ThermalConductivity,
        cp: SpecificHeat,
        density: DensityModel,
    ) -> MaterialResult<Self> {
        if !k.value.is_finite() || k.value < 0.0 {
            return Err(MaterialError::NonPhysical {
                what: "thermal conductivity",
                value: k.value,
            });
        }
        if !cp.value.is_finite() || cp.value <= 0.0 {
            return Err(MaterialError::NonPhysical {
                what: "specific heat",
                value: cp.value,
            });
        }
        Ok(Self {
            name: name.into(),
            k,
            cp,
            density,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Thermal conductivity [W/(m·K)].
    pub fn thermal_conductivity(&self) -> ThermalConductivity {
        self.k
    }

    /// Specific heat capacity [J/(kg·K)].
    pub fn specific_heat(&self) -> SpecificHeat {
        self.cp
    }

    /// Density [kg/m³] at temperature `t`.
    pub fn density(&self, t: Temperature) -> MaterialResult<Density> {
        self.density.density(t)
    }

    pub fn density_model(&self) -> &DensityModel {
        &self.density
    }

    /// Volumetric heat capacity ρ(T)·cp in J/(m³·K), raw SI.
    pub fn volumetric_heat_capacity(&self, t_k: f64) -> MaterialResult<f64> {
        Ok(self.density.density_kg_m3(t_k)? * self.cp.value)
    }
}
