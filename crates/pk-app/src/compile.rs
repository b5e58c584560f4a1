//! Scenario compilation: turns a validated `Scenario` into a runnable setup.
//!
//! Handles:
//! - Catalog and custom material construction
//! - Thermal component and link assembly into a `ThermalNetwork`
//! - Kinetics constants for the chosen isotope, spectrum and group counts
//! - Solver selection

use pk_core::Timer;
use pk_core::units::{j_per_kgk, k, kg_per_m3, m2, m3, pcm_per_k, w, w_per_m2k, w_per_mk};
use pk_materials::{DensityModel, Material};
use pk_neutronics::{Isotope, Neutronics, PrecursorInit, Spectrum};
use pk_project::schema::{
    ComponentDef, DensityDef, IntegratorDef, MaterialDef, PrecursorInitDef, RemovalScheduleDef,
    Scenario,
};
use pk_sim::{IntegratorType, SimulationSetup, SolverOptions};
use pk_thermal::{HeatRemoval, NetworkBuilder, RemovalSchedule, ThermalComponent};

use crate::error::{AppError, AppResult};

/// Build everything a `Simulation` needs from a scenario.
pub fn compile_scenario(scenario: &Scenario) -> AppResult<SimulationSetup> {
    let time = &scenario.time;
    let timer = Timer::from_seconds(time.t0_s, time.tf_s, time.dt_s, time.t_feedback_s)?;

    let nd = &scenario.neutronics;
    let isotope: Isotope = nd.isotope.parse()?;
    let spectrum: Spectrum = nd.spectrum.parse()?;
    let kinetics = Neutronics::new(isotope, spectrum, nd.precursor_groups, nd.decay_heat_groups)?;

    let mut builder = NetworkBuilder::new();
    for def in &scenario.components {
        builder.add(build_component(def, scenario.power_tot_w)?);
    }
    let network = builder.build()?;

    let solver = SolverOptions {
        rtol: scenario.solver.rtol,
        atol: scenario.solver.atol,
        max_substeps: scenario.solver.max_substeps,
        rk4_substeps: scenario.solver.rk4_substeps,
    };
    let integrator = match scenario.solver.integrator {
        IntegratorDef::DormandPrince => IntegratorType::DormandPrince,
        IntegratorDef::Rk4 => IntegratorType::Rk4,
    };
    let precursor_init = match nd.precursor_init {
        PrecursorInitDef::Zero => PrecursorInit::Zero,
        PrecursorInitDef::Equilibrium => PrecursorInit::Equilibrium,
    };

    Ok(SimulationSetup {
        timer,
        kinetics,
        network,
        insertion: scenario.reactivity.clone(),
        feedback: nd.feedback,
        precursor_init,
        integrator,
        solver,
    })
}

/// Every heat-generating component is credited the full `power_tot_w` at p = 1.
pub fn build_component(def: &ComponentDef, power_tot_w: f64) -> AppResult<ThermalComponent> {
    let material = build_material(&def.material)?;
    let mut component = ThermalComponent::new(&def.name, material, m3(def.volume_m3), k(def.t0_k));

    if def.heat_generating {
        component = component.with_heat_generation(w(power_tot_w));
    }
    if let Some(alpha) = def.alpha_pcm_per_k {
        component = component.with_feedback(pcm_per_k(alpha));
    }
    if let Some(removal) = &def.heat_removal {
        let schedule = match removal.schedule {
            RemovalScheduleDef::Constant { efficiency } => RemovalSchedule::Constant { efficiency },
            RemovalScheduleDef::Step {
                t_step_s,
                eff_init,
                eff_final,
            } => RemovalSchedule::Step {
                t_step: t_step_s,
                eff_init,
                eff_final,
            },
        };
        component = component.with_heat_removal(HeatRemoval {
            t_in: k(removal.t_in_k),
            h: w_per_m2k(removal.h_w_m2k),
            area: m2(removal.area_m2),
            schedule,
        });
    }
    for link in &def.convection {
        component.add_convection(&link.neighbor, w_per_m2k(link.h_w_m2k), m2(link.area_m2));
    }

    Ok(component)
}

pub fn build_material(def: &MaterialDef) -> AppResult<Material> {
    match def {
        MaterialDef::Catalog { id } => Ok(pk_materials::lookup(id)?),
        MaterialDef::Custom {
            name,
            k_w_mk,
            cp_j_kgk,
            density,
        } => {
            let density = match density {
                DensityDef::Constant { rho_kg_m3 } => DensityModel::constant(kg_per_m3(*rho_kg_m3)),
                DensityDef::Linear {
                    a_kg_m3,
                    b_kg_m3_per_k,
                } => DensityModel::linear(kg_per_m3(*a_kg_m3), *b_kg_m3_per_k),
                DensityDef::Polynomial { coeffs } => DensityModel::polynomial(coeffs.clone())?,
            };
            Material::new(name, w_per_mk(*k_w_mk), j_per_kgk(*cp_j_kgk), density)
                .map_err(AppError::from)
        }
    }
}
