//! Error types for the pk-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write scenario file: {path}")]
    ScenarioFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Scenario compilation failed: {0}")]
    Compile(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pk-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pk_project::ProjectError> for AppError {
    fn from(err: pk_project::ProjectError) -> Self {
        match err {
            pk_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Scenario(other.to_string()),
        }
    }
}

impl From<pk_project::ValidationError> for AppError {
    fn from(err: pk_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<pk_materials::MaterialError> for AppError {
    fn from(err: pk_materials::MaterialError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pk_thermal::ThermalError> for AppError {
    fn from(err: pk_thermal::ThermalError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pk_neutronics::KineticsError> for AppError {
    fn from(err: pk_neutronics::KineticsError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pk_core::PkError> for AppError {
    fn from(err: pk_core::PkError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pk_sim::SimError> for AppError {
    fn from(err: pk_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<pk_results::ResultsError> for AppError {
    fn from(err: pk_results::ResultsError) -> Self {
        match err {
            pk_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
