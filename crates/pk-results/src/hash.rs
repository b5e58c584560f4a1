//! Content-based hashing for run IDs.

use pk_project::schema::Scenario;
use sha2::{Digest, Sha256};

pub fn compute_run_id(scenario: &Scenario, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
