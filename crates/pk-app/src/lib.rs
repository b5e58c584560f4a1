//! Shared application service layer for pointkin.
//!
//! Centralizes scenario loading, compilation into a runnable simulation,
//! run execution with caching, and result queries for the CLI.

pub mod compile;
pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod scenario_service;

pub use compile::{build_component, build_material, compile_scenario};
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, TransientProgress};
pub use query::{
    KineticsTable, RunSummary, extract_series, get_run_summary, kinetics_table,
    list_component_names, write_series_csv,
};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run, ensure_run_with_progress,
    list_runs, load_run, records_from_history, run_scenario,
};
pub use scenario_service::{ScenarioSummary, load_scenario, save_scenario, summarize};
