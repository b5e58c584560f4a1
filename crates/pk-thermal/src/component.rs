//! Lumped thermal components and their links.

use core::fmt;

use pk_core::units::{Area, HeatTransferCoeff, Power, TempCoefficient, Temperature, Volume};
use pk_materials::Material;

use crate::error::{ThermalError, ThermalResult};

/// Arena index of a component inside a `ThermalNetwork`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convective/conductive link declared by one endpoint, naming the other.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvectionLink {
    pub neighbor: String,
    pub h: HeatTransferCoeff,
    pub area: Area,
}

impl ConvectionLink {
    /// h·A in W/K.
    pub fn conductance_w_per_k(&self) -> f64 {
        self.h.value * self.area.value
    }
}

/// Time schedule of a heat sink's effectiveness, in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub enum RemovalSchedule {
    Constant {
        efficiency: f64,
    },
    /// `eff_init` before `t_step`, `eff_final` from `t_step` on (loss of heat sink).
    Step {
        t_step: f64,
        eff_init: f64,
        eff_final: f64,
    },
}

impl RemovalSchedule {
    pub fn efficiency(&self, t: f64) -> f64 {
        match *self {
            RemovalSchedule::Constant { efficiency } => efficiency,
            RemovalSchedule::Step {
                t_step,
                eff_init,
                eff_final,
            } => {
                if t < t_step {
                    eff_init
                } else {
                    eff_final
                }
            }
        }
    }

    fn efficiencies(&self) -> [f64; 2] {
        match *self {
            RemovalSchedule::Constant { efficiency } => [efficiency, efficiency],
            RemovalSchedule::Step {
                eff_init,
                eff_final,
                ..
            } => [eff_init, eff_final],
        }
    }
}

/// Heat sink pulling a component toward a fixed inlet temperature.
///
/// Removes `eff(t) · h·A · (T - T_in)` watts.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatRemoval {
    pub t_in: Temperature,
    pub h: HeatTransferCoeff,
    pub area: Area,
    pub schedule: RemovalSchedule,
}

impl HeatRemoval {
    pub fn heat_removed_w(&self, t: f64, temp_k: f64) -> f64 {
        self.schedule.efficiency(t) * self.h.value * self.area.value * (temp_k - self.t_in.value)
    }
}

/// A spatially uniform thermal mass.
#[derive(Clone, Debug)]
pub struct ThermalComponent {
    name: String,
    material: Material,
    volume: Volume,
    t0: Temperature,
    power_tot: Option<Power>,
    alpha: Option<TempCoefficient>,
    links: Vec<ConvectionLink>,
    removal: Option<HeatRemoval>,
}

impl ThermalComponent {
    pub fn new(name: impl Into<String>, material: Material, volume: Volume, t0: Temperature) -> Self {
        Self {
            name: name.into(),
            material,
            volume,
            t0,
            power_tot: None,
            alpha: None,
            links: Vec::new(),
            removal: None,
        }
    }

    /// Mark this component as generating `power_tot` at normalized power 1.
    pub fn with_heat_generation(mut self, power_tot: Power) -> Self {
        self.power_tot = Some(power_tot);
        self
    }

    /// Temperature reactivity coefficient (Δk/k per K).
    pub fn with_feedback(mut self, alpha: TempCoefficient) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_heat_removal(mut self, removal: HeatRemoval) -> Self {
        self.removal = Some(removal);
        self
    }

    /// Declare a convective link to `neighbor`. The neighbor must declare the reciprocal.
    pub fn add_convection(
        &mut self,
        neighbor: impl Into<String>,
        h: HeatTransferCoeff,
        area: Area,
    ) -> &mut Self {
        self.links.push(ConvectionLink {
            neighbor: neighbor.into(),
            h,
            area,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn initial_temperature(&self) -> Temperature {
        self.t0
    }

    pub fn is_heat_generating(&self) -> bool {
        self.power_tot.is_some()
    }

    pub fn power_reference(&self) -> Option<Power> {
        self.power_tot
    }

    pub fn feedback_coefficient(&self) -> Option<TempCoefficient> {
        self.alpha
    }

    pub fn links(&self) -> &[ConvectionLink] {
        &self.links
    }

    pub fn heat_removal(&self) -> Option<&HeatRemoval> {
        self.removal.as_ref()
    }

    /// ρ(T)·V·cp in J/K.
    pub fn heat_capacity_j_per_k(&self, temp_k: f64) -> ThermalResult<f64> {
        let rho_cp = self
            .material
            .volumetric_heat_capacity(temp_k)
            .map_err(|source| ThermalError::Material {
                component: self.name.clone(),
                source,
            })?;
        Ok(rho_cp * self.volume.value)
    }

    /// Check scalar parameters; links are checked network-wide.
    pub(crate) fn check_parameters(&self) -> ThermalResult<()> {
        let invalid = |what| ThermalError::InvalidParameter {
            component: self.name.clone(),
            what,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if !(self.volume.value.is_finite() && self.volume.value > 0.0) {
            return Err(invalid("volume must be positive"));
        }
        if !(self.t0.value.is_finite() && self.t0.value > 0.0) {
            return Err(invalid("initial temperature must be positive"));
        }
        if let Some(power) = self.power_tot
            && !(power.value.is_finite() && power.value >= 0.0)
        {
            return Err(invalid("total power must be non-negative"));
        }
        if let Some(alpha) = self.alpha
            && !alpha.value.is_finite()
        {
            return Err(invalid("feedback coefficient must be finite"));
        }
        for link in &self.links {
            let g = link.conductance_w_per_k();
            if !(link.h.value > 0.0 && link.area.value > 0.0 && g.is_finite()) {
                return Err(invalid("convection h and area must be positive"));
            }
        }
        if let Some(removal) = &self.removal {
            let g = removal.h.value * removal.area.value;
            if !(removal.h.value > 0.0 && removal.area.value > 0.0 && g.is_finite()) {
                return Err(invalid("heat removal h and area must be positive"));
            }
            if !(removal.t_in.value.is_finite() && removal.t_in.value > 0.0) {
                return Err(invalid("heat removal inlet temperature must be positive"));
            }
            if removal
                .schedule
                .efficiencies()
                .iter()
                .any(|eff| !(0.0..=1.0).contains(eff))
            {
                return Err(invalid("heat removal efficiency must lie in [0, 1]"));
            }
        }
        Ok(())
    }
}
