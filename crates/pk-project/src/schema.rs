//! Scenario schema definitions.

use pk_reactivity::ReactivityInsertion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub time: TimeDef,
    pub neutronics: NeutronicsDef,
    #[serde(default)]
    pub reactivity: ReactivityInsertion,
    /// Thermal power of each heat-generating component at normalized power 1.
    pub power_tot_w: f64,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    #[serde(default)]
    pub t0_s: f64,
    pub tf_s: f64,
    pub dt_s: f64,
    #[serde(default)]
    pub t_feedback_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeutronicsDef {
    pub isotope: String,
    pub spectrum: String,
    pub precursor_groups: usize,
    #[serde(default)]
    pub decay_heat_groups: usize,
    #[serde(default = "default_true")]
    pub feedback: bool,
    #[serde(default)]
    pub precursor_init: PrecursorInitDef,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrecursorInitDef {
    #[default]
    Zero,
    Equilibrium,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntegratorDef {
    #[default]
    DormandPrince,
    Rk4,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    #[serde(default = "default_max_substeps")]
    pub max_substeps: usize,
    #[serde(default = "default_rk4_substeps")]
    pub rk4_substeps: usize,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            integrator: IntegratorDef::default(),
            rtol: default_rtol(),
            atol: default_atol(),
            max_substeps: default_max_substeps(),
            rk4_substeps: default_rk4_substeps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    pub material: MaterialDef,
    pub volume_m3: f64,
    pub t0_k: f64,
    #[serde(default)]
    pub heat_generating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_pcm_per_k: Option<f64>,
    #[serde(default)]
    pub convection: Vec<ConvectionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_removal: Option<HeatRemovalDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MaterialDef {
    Catalog {
        id: String,
    },
    Custom {
        name: String,
        k_w_mk: f64,
        cp_j_kgk: f64,
        density: DensityDef,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DensityDef {
    Constant { rho_kg_m3: f64 },
    /// ρ(T) = a + b·T
    Linear { a_kg_m3: f64, b_kg_m3_per_k: f64 },
    /// ρ(T) = Σ c_i T^i
    Polynomial { coeffs: Vec<f64> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvectionDef {
    pub neighbor: String,
    pub h_w_m2k: f64,
    pub area_m2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatRemovalDef {
    pub t_in_k: f64,
    pub h_w_m2k: f64,
    pub area_m2: f64,
    #[serde(default)]
    pub schedule: RemovalScheduleDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RemovalScheduleDef {
    Constant {
        efficiency: f64,
    },
    Step {
        t_step_s: f64,
        eff_init: f64,
        eff_final: f64,
    },
}

impl Default for RemovalScheduleDef {
    fn default() -> Self {
        RemovalScheduleDef::Constant { efficiency: 1.0 }
    }
}

fn default_true() -> bool {
    true
}

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-12
}

fn default_max_substeps() -> usize {
    1_000_000
}

fn default_rk4_substeps() -> usize {
    1
}
