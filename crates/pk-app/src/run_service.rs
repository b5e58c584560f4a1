//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use pk_project::schema::Scenario;
use pk_results::{
    ComponentSnapshot, RunManifest, RunStatus, RunStore, TimeseriesRecord, compute_run_id,
};
use pk_sim::{RunState, SimOutcome, SimProgress, Simulation, SimulationHistory};
use tracing::{info, warn};

use crate::compile;
use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage, TransientProgress};
use crate::scenario_service;

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario_path: &'a Path,
    pub options: RunOptions,
}

/// Wall-clock breakdown of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
    pub steps: usize,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
///
/// A run that fails mid-integration is still stored, with a `Failed` status
/// and every record up to the last successful step.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingScenario,
        started,
        "Loading scenario",
    );
    let scenario = scenario_service::load_scenario(request.scenario_path)?;

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        "Checking run cache",
    );
    let run_id = compute_run_id(&scenario, &request.options.solver_version);
    let store = RunStore::for_scenario(request.scenario_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );

        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        timing.steps = manifest.records;
        info!(run_id = %run_id, scenario = %scenario.name, "loaded cached run");

        emit_progress(
            &mut progress_cb,
            RunStage::Completed,
            started,
            "Loaded cached run",
        );

        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    emit_progress(
        &mut progress_cb,
        RunStage::Compiling,
        started,
        "Compiling scenario",
    );
    let compile_started = Instant::now();
    let setup = compile::compile_scenario(&scenario)?;
    let mut sim = Simulation::new(setup)?;
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::RunningTransient,
        started,
        "Running transient",
    );
    let simulate_started = Instant::now();
    {
        let mut forward = |p: SimProgress| {
            if let Some(cb) = progress_cb.as_deref_mut() {
                cb(RunProgressEvent {
                    stage: RunStage::RunningTransient,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    transient: Some(TransientProgress::from(p)),
                });
            }
        };
        if let Err(err) = sim.run_with_progress(Some(&mut forward)) {
            warn!(run_id = %run_id, error = %err, "transient stopped early");
        }
    }
    timing.simulate_time_s = simulate_started.elapsed().as_secs_f64();
    let outcome = sim.into_outcome();

    emit_progress(
        &mut progress_cb,
        RunStage::SavingResults,
        started,
        "Saving results",
    );
    let save_started = Instant::now();
    let manifest = build_manifest(&run_id, &scenario, &request.options.solver_version, &outcome);
    let records = records_from_history(&outcome.history);
    store.save_run(&manifest, &records)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.steps = records.len();
    timing.total_time_s = started.elapsed().as_secs_f64();

    match &manifest.status {
        RunStatus::Completed => info!(
            run_id = %run_id,
            records = records.len(),
            elapsed_s = timing.total_time_s,
            "run completed"
        ),
        RunStatus::Failed { message } => warn!(
            run_id = %run_id,
            records = records.len(),
            error = %message,
            "run failed; partial history stored"
        ),
    }

    emit_progress(&mut progress_cb, RunStage::Completed, started, "Run finished");

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

/// Compile and run a scenario in memory, without touching the run store.
pub fn run_scenario(scenario: &Scenario) -> AppResult<SimOutcome> {
    let setup = compile::compile_scenario(scenario)?;
    let mut sim = Simulation::new(setup)?;
    if let Err(err) = sim.run() {
        warn!(scenario = %scenario.name, error = %err, "transient stopped early");
    }
    Ok(sim.into_outcome())
}

fn build_manifest(
    run_id: &str,
    scenario: &Scenario,
    solver_version: &str,
    outcome: &SimOutcome,
) -> RunManifest {
    let history = &outcome.history;
    let status = match (outcome.state, &outcome.error) {
        (RunState::Completed, _) => RunStatus::Completed,
        (_, Some(err)) => RunStatus::Failed {
            message: err.to_string(),
        },
        (state, None) => RunStatus::Failed {
            message: format!("run stopped in state {:?}", state),
        },
    };

    RunManifest {
        run_id: run_id.to_string(),
        scenario_name: scenario.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        solver_version: solver_version.to_string(),
        status,
        dt_s: scenario.time.dt_s,
        t_end_s: scenario.time.tf_s,
        steps: history.capacity(),
        records: history.len(),
        component_names: history.component_names().to_vec(),
        precursor_groups: history.precursor_groups(),
        decay_heat_groups: history.decay_heat_groups(),
    }
}

/// Flatten a history into per-step records for storage.
pub fn records_from_history(history: &SimulationHistory) -> Vec<TimeseriesRecord> {
    let names = history.component_names();
    history
        .rows()
        .map(|row| TimeseriesRecord {
            step: row.step,
            time_s: row.time,
            reactivity: row.reactivity,
            power: row.power,
            thermal_power: row.thermal_power,
            precursors: row.precursors.to_vec(),
            decay_heat: row.decay_heat.to_vec(),
            components: names
                .iter()
                .zip(row.temperatures)
                .map(|(name, &t_k)| ComponentSnapshot {
                    name: name.clone(),
                    t_k,
                })
                .collect(),
        })
        .collect()
}

/// List stored runs of a scenario, most recent first.
pub fn list_runs(scenario_path: &Path) -> AppResult<Vec<RunManifest>> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let store = RunStore::for_scenario(scenario_path)?;

    Ok(store.list_runs(&scenario.name)?)
}

/// Load a specific run.
pub fn load_run(
    scenario_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TimeseriesRecord>)> {
    let store = RunStore::for_scenario(scenario_path)?;

    let run = store.load_run(run_id)?;

    Ok((run.manifest, run.records))
}
