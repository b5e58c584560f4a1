//! Scenario loading, saving and introspection.

use std::path::Path;

use pk_core::Timer;
use pk_project::schema::Scenario;

use crate::error::{AppError, AppResult};

/// Short description of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub isotope: String,
    pub spectrum: String,
    pub precursor_groups: usize,
    pub decay_heat_groups: usize,
    pub component_count: usize,
    pub link_count: usize,
    pub steps: usize,
}

/// Load, migrate and validate a scenario; `.json` files are read as JSON, all else as YAML.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    let scenario = if is_json(path) {
        pk_project::load_json(path)?
    } else {
        pk_project::load_yaml(path)?
    };
    Ok(scenario)
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    if is_json(path) {
        pk_project::save_json(path, scenario)?;
    } else {
        pk_project::save_yaml(path, scenario)?;
    }
    Ok(())
}

pub fn summarize(scenario: &Scenario) -> ScenarioSummary {
    let declared: usize = scenario.components.iter().map(|c| c.convection.len()).sum();
    let time = &scenario.time;
    let steps = Timer::from_seconds(time.t0_s, time.tf_s, time.dt_s, time.t_feedback_s)
        .map(|timer| timer.step_count())
        .unwrap_or(0);
    ScenarioSummary {
        name: scenario.name.clone(),
        isotope: scenario.neutronics.isotope.clone(),
        spectrum: scenario.neutronics.spectrum.clone(),
        precursor_groups: scenario.neutronics.precursor_groups,
        decay_heat_groups: scenario.neutronics.decay_heat_groups,
        component_count: scenario.components.len(),
        // each link is declared from both ends
        link_count: declared / 2,
        steps,
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
