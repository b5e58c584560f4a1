//! Coupled neutronics/thermal driver.
//!
//! Each grid step advances the two subsystems one after the other:
//! the neutronics see the temperatures recorded at the previous step (held fixed
//! across the interval), the thermal network then sees the power produced in
//! this same step.

use pk_core::Timer;
use pk_neutronics::{Neutronics, PrecursorInit};
use pk_reactivity::{FeedbackComposer, FeedbackTerm, ReactivityInsertion};
use pk_thermal::ThermalNetwork;
use tracing::{debug, info, warn};

use crate::error::{FailureReason, SimError, SimResult};
use crate::history::SimulationHistory;
use crate::integrator::{Integrator, IntegratorType, SolverOptions, StepStats, Stepper};
use crate::model::OdeSystem;

/// Driver lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Stepping,
    Completed,
    Failed,
}

/// Everything needed to build a `Simulation`.
#[derive(Clone, Debug)]
pub struct SimulationSetup {
    pub timer: Timer,
    pub kinetics: Neutronics,
    pub network: ThermalNetwork,
    pub insertion: ReactivityInsertion,
    pub feedback: bool,
    pub precursor_init: PrecursorInit,
    pub integrator: IntegratorType,
    pub solver: SolverOptions,
}

/// Progress snapshot after a completed step.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimProgress {
    pub step: usize,
    pub step_count: usize,
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub power: f64,
    pub substeps: usize,
}

/// Final state of a run, with the history up to the last successful step.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    pub state: RunState,
    pub history: SimulationHistory,
    pub error: Option<SimError>,
}

/// Point kinetics driven by total reactivity, with temperatures held fixed.
struct KineticsSystem<'a> {
    kinetics: &'a Neutronics,
    composer: &'a FeedbackComposer,
    temperatures: &'a [f64],
}

impl OdeSystem for KineticsSystem<'_> {
    fn dim(&self) -> usize {
        self.kinetics.state_len()
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> SimResult<()> {
        let rho = self
            .composer
            .reactivity_at(t, self.temperatures)
            .map_err(|e| model_failure(t, e))?;
        self.kinetics
            .rhs(rho, y, dydt)
            .map_err(|e| model_failure(t, e))
    }
}

/// Thermal network heated at a fixed normalized power.
struct ThermalSystem<'a> {
    network: &'a ThermalNetwork,
    thermal_power: f64,
}

impl OdeSystem for ThermalSystem<'_> {
    fn dim(&self) -> usize {
        self.network.len()
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> SimResult<()> {
        self.network
            .derivatives(t, y, self.thermal_power, dydt)
            .map_err(|e| model_failure(t, e))
    }
}

fn model_failure(t: f64, e: impl std::fmt::Display) -> SimError {
    SimError::IntegrationFailure {
        t,
        reason: FailureReason::Model {
            message: e.to_string(),
        },
    }
}

/// Owns the whole simulation context: models, integrator state and history.
#[derive(Debug)]
pub struct Simulation {
    timer: Timer,
    kinetics: Neutronics,
    network: ThermalNetwork,
    composer: FeedbackComposer,
    neutronics_stepper: Stepper,
    thermal_stepper: Stepper,
    state: RunState,
    step: usize,
    y_neutronics: Vec<f64>,
    temperatures: Vec<f64>,
    history: SimulationHistory,
    last_stats: StepStats,
    error: Option<SimError>,
}

impl Simulation {
    /// Validate the setup and record the initial row. Nothing is integrated yet.
    pub fn new(setup: SimulationSetup) -> SimResult<Self> {
        let SimulationSetup {
            timer,
            kinetics,
            network,
            insertion,
            feedback,
            precursor_init,
            integrator,
            solver,
        } = setup;

        solver.validate()?;

        let terms = network
            .feedback_coefficients()
            .into_iter()
            .map(|fc| FeedbackTerm {
                index: fc.component.index(),
                alpha_per_k: fc.alpha_per_k,
            })
            .collect();
        let mut composer = FeedbackComposer::new(insertion, terms, feedback, timer.t_feedback())?;

        let y_neutronics = kinetics.initial_state(1.0, precursor_init).flatten();
        let temperatures = network.initial_temperatures();
        let thermal_power = kinetics.thermal_power(&y_neutronics)?;

        let mut history = SimulationHistory::with_capacity(
            timer.step_count(),
            kinetics.precursor_groups(),
            kinetics.decay_heat_groups(),
            network.names().map(str::to_string).collect(),
        );
        let rho0 = composer.reactivity_at(timer.t0(), &temperatures)?;
        history.push(timer.t0(), rho0, &y_neutronics, thermal_power, &temperatures)?;
        if timer.feedback_index() == 0 {
            composer.capture_reference(&temperatures)?;
        }

        Ok(Self {
            neutronics_stepper: Stepper::new(integrator, &solver),
            thermal_stepper: Stepper::new(integrator, &solver),
            timer,
            kinetics,
            network,
            composer,
            state: RunState::Initialized,
            step: 0,
            y_neutronics,
            temperatures,
            history,
            last_stats: StepStats::default(),
            error: None,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn kinetics(&self) -> &Neutronics {
        &self.kinetics
    }

    pub fn network(&self) -> &ThermalNetwork {
        &self.network
    }

    pub fn composer(&self) -> &FeedbackComposer {
        &self.composer
    }

    pub fn history(&self) -> &SimulationHistory {
        &self.history
    }

    pub fn error(&self) -> Option<&SimError> {
        self.error.as_ref()
    }

    /// Last completed grid step.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Advance one grid step. Returns `false` once the run is complete.
    pub fn advance(&mut self) -> SimResult<bool> {
        match self.state {
            RunState::Completed => return Ok(false),
            RunState::Failed => {
                return Err(self
                    .error
                    .clone()
                    .unwrap_or_else(|| SimError::configuration("simulation failed")));
            }
            RunState::Initialized => {
                info!(
                    steps = self.timer.step_count(),
                    dt = self.timer.dt(),
                    tf = self.timer.tf(),
                    "starting simulation"
                );
                self.state = RunState::Stepping;
            }
            RunState::Stepping => {}
        }

        if self.step + 1 >= self.timer.step_count() {
            self.state = RunState::Completed;
            return Ok(false);
        }

        match self.step_once() {
            Ok(stats) => {
                self.last_stats = stats;
                if self.step + 1 >= self.timer.step_count() {
                    self.state = RunState::Completed;
                    info!(steps = self.history.len(), "simulation completed");
                }
                Ok(true)
            }
            Err(e) => {
                warn!(step = self.step + 1, error = %e, "simulation failed");
                self.state = RunState::Failed;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn step_once(&mut self) -> SimResult<StepStats> {
        let i = self.step + 1;
        let t_prev = self.timer.time_at(self.step)?;
        let t_i = self.timer.time_at(i)?;

        // neutronics see the temperatures recorded at step i-1
        let lagged = self.temperatures.clone();
        let mut y_n = self.y_neutronics.clone();
        let n_stats = self.neutronics_stepper.integrate(
            &KineticsSystem {
                kinetics: &self.kinetics,
                composer: &self.composer,
                temperatures: &lagged,
            },
            t_prev,
            t_i,
            &mut y_n,
        )?;
        let thermal_power = self.kinetics.thermal_power(&y_n)?;

        let mut temps = lagged.clone();
        let t_stats = self.thermal_stepper.integrate(
            &ThermalSystem {
                network: &self.network,
                thermal_power,
            },
            t_prev,
            t_i,
            &mut temps,
        )?;

        let rho = self.composer.reactivity_at(t_i, &lagged)?;
        self.history
            .push(t_i, rho, &y_n, thermal_power, &temps)?;
        self.y_neutronics = y_n;
        self.temperatures = temps;
        self.step = i;

        if i == self.timer.feedback_index() && self.composer.capture_reference(&self.temperatures)? {
            debug!(step = i, t = t_i, "captured feedback reference temperatures");
        }

        debug!(
            step = i,
            neutronics_substeps = n_stats.accepted + n_stats.rejected,
            thermal_substeps = t_stats.accepted + t_stats.rejected,
            "step complete"
        );
        Ok(StepStats {
            accepted: n_stats.accepted + t_stats.accepted,
            rejected: n_stats.rejected + t_stats.rejected,
            rhs_evals: n_stats.rhs_evals + t_stats.rhs_evals,
        })
    }

    /// Run to `tf`.
    pub fn run(&mut self) -> SimResult<&SimulationHistory> {
        self.run_with_progress(None)
    }

    /// Run to `tf`, reporting after every step.
    pub fn run_with_progress(
        &mut self,
        mut progress: Option<&mut dyn FnMut(SimProgress)>,
    ) -> SimResult<&SimulationHistory> {
        let step_count = self.timer.step_count();
        let span = self.timer.tf() - self.timer.t0();
        while self.advance()? {
            if let Some(cb) = progress.as_deref_mut() {
                let sim_time_s = self.history.times()[self.step];
                cb(SimProgress {
                    step: self.step,
                    step_count,
                    sim_time_s,
                    t_end_s: self.timer.tf(),
                    fraction_complete: ((sim_time_s - self.timer.t0()) / span).clamp(0.0, 1.0),
                    power: self.y_neutronics[0],
                    substeps: self.last_stats.accepted + self.last_stats.rejected,
                });
            }
        }
        Ok(&self.history)
    }

    /// Consume the driver, keeping whatever history was recorded.
    pub fn into_outcome(self) -> SimOutcome {
        SimOutcome {
            state: self.state,
            history: self.history,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::units::{k, kw, m2, m3, pcm_per_k, w_per_m2k};
    use pk_materials::catalog;
    use pk_neutronics::{Isotope, Spectrum};
    use pk_thermal::{NetworkBuilder, ThermalComponent};

    fn setup(tf: f64, dt: f64, n_pg: usize, init: PrecursorInit) -> SimulationSetup {
        let mut fuel = ThermalComponent::new("fuel", catalog::graphite().unwrap(), m3(0.1), k(500.0))
            .with_heat_generation(kw(10.0))
            .with_feedback(pcm_per_k(-1.0));
        fuel.add_convection("cool", w_per_m2k(500.0), m2(1.0));
        let mut cool = ThermalComponent::new("cool", catalog::water().unwrap(), m3(1.0), k(500.0));
        cool.add_convection("fuel", w_per_m2k(500.0), m2(1.0));
        let mut builder = NetworkBuilder::new();
        builder.add(fuel);
        builder.add(cool);

        SimulationSetup {
            timer: Timer::from_seconds(0.0, tf, dt, 0.0).unwrap(),
            kinetics: Neutronics::new(Isotope::U235, Spectrum::Thermal, n_pg, 0).unwrap(),
            network: builder.build().unwrap(),
            insertion: ReactivityInsertion::default(),
            feedback: true,
            precursor_init: init,
            integrator: IntegratorType::DormandPrince,
            solver: SolverOptions::default(),
        }
    }

    #[test]
    fn new_records_initial_row_only() {
        let sim = Simulation::new(setup(1.0, 0.1, 6, PrecursorInit::Zero)).unwrap();
        assert_eq!(sim.state(), RunState::Initialized);
        assert_eq!(sim.history().len(), 1);
        assert_eq!(sim.history().capacity(), 11);
        assert_eq!(sim.history().power()[0], 1.0);
        // feedback index 0: reference captured before stepping
        assert_eq!(sim.composer().reference(), Some(&[500.0, 500.0][..]));
    }

    #[test]
    fn run_fills_history_and_completes() {
        let mut sim = Simulation::new(setup(1.0, 0.1, 6, PrecursorInit::Equilibrium)).unwrap();
        let mut calls = 0;
        let mut cb = |_p: SimProgress| calls += 1;
        sim.run_with_progress(Some(&mut cb)).unwrap();
        assert_eq!(sim.state(), RunState::Completed);
        assert_eq!(sim.history().len(), 11);
        assert_eq!(sim.current_step(), 10);
        assert_eq!(calls, 10);

        // running again is a no-op
        assert!(!sim.advance().unwrap());
        assert_eq!(sim.history().len(), 11);
    }

    #[test]
    fn failure_keeps_partial_history() {
        let mut s = setup(1.0, 0.01, 6, PrecursorInit::Equilibrium);
        s.insertion = ReactivityInsertion::Constant { rho: 0.5 };
        s.feedback = false;
        s.solver.max_substeps = 5;
        let mut sim = Simulation::new(s).unwrap();

        let err = sim.run().unwrap_err();
        assert!(err.is_integration_failure());
        assert_eq!(sim.state(), RunState::Failed);
        assert!(sim.history().len() >= 1);
        assert!(sim.history().len() < sim.timer().step_count());

        // the stored error is returned again, nothing steps
        let len = sim.history().len();
        assert!(sim.advance().is_err());
        assert_eq!(sim.history().len(), len);

        let outcome = sim.into_outcome();
        assert_eq!(outcome.state, RunState::Failed);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn invalid_solver_options_rejected_eagerly() {
        let mut s = setup(1.0, 0.1, 6, PrecursorInit::Zero);
        s.solver.rtol = 0.0;
        assert!(matches!(
            Simulation::new(s),
            Err(SimError::Configuration { .. })
        ));
    }
}
