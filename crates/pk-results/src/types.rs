//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    pub timestamp: String,
    pub solver_version: String,
    pub status: RunStatus,
    pub dt_s: f64,
    pub t_end_s: f64,
    /// Grid points the run was sized for; `records` may be fewer after a failure.
    pub steps: usize,
    pub records: usize,
    pub component_names: Vec<String>,
    pub precursor_groups: usize,
    pub decay_heat_groups: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunStatus {
    Completed,
    Failed { message: String },
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub step: usize,
    pub time_s: f64,
    pub reactivity: f64,
    pub power: f64,
    pub thermal_power: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub precursors: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decay_heat: Vec<f64>,
    pub components: Vec<ComponentSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentSnapshot {
    pub name: String,
    pub t_k: f64,
}
