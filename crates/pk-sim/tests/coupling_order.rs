//! Operator-split coupling order on a coarse grid.
//!
//! One adiabatic heat-generating component with constant density, so each step's
//! temperature rise is exactly P_ref·q·dt / (ρ V cp) for whatever q the thermal
//! solve was handed.

use pk_core::Timer;
use pk_core::units::{j_per_kgk, k, kg_per_m3, kw, m3, pcm_per_k, w_per_mk};
use pk_materials::{DensityModel, Material};
use pk_neutronics::{Isotope, Neutronics, PrecursorInit, Spectrum};
use pk_reactivity::ReactivityInsertion;
use pk_sim::{IntegratorType, RunState, Simulation, SimulationSetup, SolverOptions};
use pk_thermal::{NetworkBuilder, ThermalComponent};

const RHO_EXT: f64 = 1e-4;
// -1 pcm/K
const ALPHA: f64 = -1e-5;
const P_REF_W: f64 = 100e3;
const HEAT_CAPACITY_J_PER_K: f64 = 6000.0 * 0.01 * 300.0;
const DT: f64 = 0.1;

fn run(t_feedback: f64) -> Simulation {
    let slab = Material::new(
        "slab",
        w_per_mk(10.0),
        j_per_kgk(300.0),
        DensityModel::constant(kg_per_m3(6000.0)),
    )
    .unwrap();
    let fuel = ThermalComponent::new("fuel", slab, m3(0.01), k(500.0))
        .with_heat_generation(kw(P_REF_W / 1e3))
        .with_feedback(pcm_per_k(-1.0));
    let mut builder = NetworkBuilder::new();
    builder.add(fuel);

    let mut sim = Simulation::new(SimulationSetup {
        timer: Timer::from_seconds(0.0, 1.0, DT, t_feedback).unwrap(),
        kinetics: Neutronics::new(Isotope::U235, Spectrum::Thermal, 6, 0).unwrap(),
        network: builder.build().unwrap(),
        insertion: ReactivityInsertion::Constant { rho: RHO_EXT },
        feedback: true,
        precursor_init: PrecursorInit::Equilibrium,
        integrator: IntegratorType::DormandPrince,
        solver: SolverOptions::default(),
    })
    .unwrap();
    sim.run().unwrap();
    assert_eq!(sim.state(), RunState::Completed);
    sim
}

#[test]
fn reactivity_sees_previous_step_temperatures() {
    let sim = run(0.0);
    let history = sim.history();
    let temps = history.temperature_series(0).unwrap();
    let rho = history.reactivity();
    assert_eq!(rho.len(), 11);

    // reference taken at t0, and step 1 still sees T[0]
    assert!((rho[0] - RHO_EXT).abs() < 1e-15);
    assert!((rho[1] - RHO_EXT).abs() < 1e-15);

    for i in 2..rho.len() {
        let lagged = RHO_EXT + ALPHA * (temps[i - 1] - temps[0]);
        let same_step = RHO_EXT + ALPHA * (temps[i] - temps[0]);
        assert!(
            (rho[i] - lagged).abs() < 1e-13,
            "step {}: rho {} vs lagged {}",
            i,
            rho[i],
            lagged
        );
        assert!((rho[i] - same_step).abs() > 1e-7);
    }
}

#[test]
fn late_reference_is_captured_at_feedback_step() {
    let sim = run(0.3);
    let fi = sim.timer().feedback_index();
    assert_eq!(fi, 3);

    let history = sim.history();
    let temps = history.temperature_series(0).unwrap();
    let rho = history.reactivity();
    assert_eq!(sim.composer().reference().unwrap()[0], temps[fi]);

    // the step that captures the reference and the one after it carry no feedback
    for r in &rho[..=fi + 1] {
        assert!((r - RHO_EXT).abs() < 1e-15);
    }
    for i in fi + 2..rho.len() {
        let lagged = RHO_EXT + ALPHA * (temps[i - 1] - temps[fi]);
        assert!((rho[i] - lagged).abs() < 1e-13);
    }
}

#[test]
fn thermal_step_uses_same_step_power() {
    let sim = run(0.0);
    let history = sim.history();
    let temps = history.temperature_series(0).unwrap();
    let q = history.thermal_power();

    for i in 1..temps.len() {
        let rise = temps[i] - temps[i - 1];
        let expected = P_REF_W * q[i] * DT / HEAT_CAPACITY_J_PER_K;
        let previous = P_REF_W * q[i - 1] * DT / HEAT_CAPACITY_J_PER_K;
        assert!(
            (rise - expected).abs() < 1e-9 * expected,
            "step {}: rise {} vs {}",
            i,
            rise,
            expected
        );
        assert!((rise - previous).abs() > 1e-6 * expected);
    }
}
