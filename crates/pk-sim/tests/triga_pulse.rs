//! Integration test: TRIGA-like fuel/coolant pair under a reactivity impulse.
//!
//! Fuel rods (U-ZrH) convect into the pool water; fuel carries a -1.1 pcm/K
//! temperature coefficient, feedback activates at 0.5 s and +0.001 Δk/k is
//! inserted on [1, 2] s. The run lasts 10 s at dt = 0.5 ms.

use std::f64::consts::PI;

use pk_core::Timer;
use pk_core::units::{k, kw, m2, m3, pcm_per_k, w_per_m2k};
use pk_materials::catalog;
use pk_neutronics::{Isotope, Neutronics, PrecursorInit, Spectrum};
use pk_reactivity::ReactivityInsertion;
use pk_sim::{IntegratorType, RunState, Simulation, SimulationSetup, SolverOptions};
use pk_thermal::{NetworkBuilder, ThermalComponent, ThermalNetwork};

const N_RODS: f64 = 63.0;
const ROD_RADIUS_M: f64 = 0.0356 / 2.0;
const ROD_HEIGHT_M: f64 = 0.3556;
const POOL_RADIUS_M: f64 = 0.96;
const POOL_HEIGHT_M: f64 = 6.625;
const H_WATER: f64 = 7000.0;

fn triga_network() -> ThermalNetwork {
    let fuel_volume = N_RODS * PI * ROD_RADIUS_M.powi(2) * ROD_HEIGHT_M;
    let fuel_area = N_RODS * 2.0 * PI * ROD_RADIUS_M * ROD_HEIGHT_M;
    let pool_volume = PI * POOL_RADIUS_M.powi(2) * POOL_HEIGHT_M;

    let mut fuel = ThermalComponent::new("fuel", catalog::lookup("uzrh").unwrap(), m3(fuel_volume), k(500.0))
        .with_heat_generation(kw(250.0))
        .with_feedback(pcm_per_k(-1.1));
    fuel.add_convection("cool", w_per_m2k(H_WATER), m2(fuel_area));

    let mut cool = ThermalComponent::new("cool", catalog::lookup("water").unwrap(), m3(pool_volume), k(500.0));
    cool.add_convection("fuel", w_per_m2k(H_WATER), m2(fuel_area));

    let mut builder = NetworkBuilder::new();
    builder.add(fuel);
    builder.add(cool);
    builder.build().unwrap()
}

fn triga_setup(init: PrecursorInit) -> SimulationSetup {
    SimulationSetup {
        timer: Timer::from_seconds(0.0, 10.0, 0.0005, 0.5).unwrap(),
        kinetics: Neutronics::new(Isotope::U235, Spectrum::Thermal, 6, 0).unwrap(),
        network: triga_network(),
        insertion: ReactivityInsertion::Impulse {
            t_start: 1.0,
            t_end: 2.0,
            rho_init: 0.0,
            rho_max: 0.001,
        },
        feedback: true,
        precursor_init: init,
        integrator: IntegratorType::DormandPrince,
        solver: SolverOptions::default(),
    }
}

fn power_at(sim: &Simulation, t: f64) -> f64 {
    let i = sim.timer().index_of(t).unwrap();
    sim.history().power()[i]
}

#[test]
fn triga_impulse_from_steady_state() {
    let mut sim = Simulation::new(triga_setup(PrecursorInit::Equilibrium)).unwrap();
    sim.run().unwrap();

    assert_eq!(sim.state(), RunState::Completed);
    let history = sim.history();
    assert_eq!(history.len(), 20_001);

    // power rises while the impulse is in
    assert!(power_at(&sim, 1.9) > power_at(&sim, 0.99));

    let fuel = history.component_index("fuel").unwrap();
    let temps = history.temperature_series(fuel).unwrap();
    let t_end = *temps.last().unwrap();
    assert!(t_end > 500.0);

    // the fuel heated up after the reference was taken at 0.5 s
    let reference = sim.composer().reference().unwrap();
    let final_temps = history.last().unwrap().temperatures;
    let feedback = sim.composer().feedback_at(10.0, final_temps).unwrap();
    assert!(final_temps[fuel] > reference[fuel]);
    assert!(feedback < 0.0);

    // before activation the recorded reactivity is the bare insertion
    let i_fb = sim.timer().feedback_index();
    assert!(history.reactivity()[..i_fb].iter().all(|rho| *rho == 0.0));
}

#[test]
fn triga_impulse_from_cold_precursors() {
    let mut sim = Simulation::new(triga_setup(PrecursorInit::Zero)).unwrap();
    sim.run().unwrap();

    assert_eq!(sim.state(), RunState::Completed);
    // without a delayed-neutron inventory the power first collapses
    assert!(power_at(&sim, 0.5) < 0.1);
    // and the prompt jump still shows when the impulse goes in
    assert!(power_at(&sim, 1.5) > power_at(&sim, 0.99));

    let history = sim.history();
    let fuel = history.component_index("fuel").unwrap();
    let fuel_end = history.last().unwrap().temperatures[fuel];
    assert!(fuel_end > 500.0);
}
