//! pk-results: run cache and timeseries storage.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::{RunStore, StoredRun};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Run {run_id} does not match its manifest: {message}")]
    Inconsistent { run_id: String, message: String },

    #[error("Stored run {run_id} is corrupt: {message}")]
    Corrupt { run_id: String, message: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
