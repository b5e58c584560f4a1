use pk_sim::SimProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingScenario,
    CheckingCache,
    LoadingCachedResult,
    Compiling,
    RunningTransient,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingScenario => "loading",
            RunStage::CheckingCache => "cache",
            RunStage::LoadingCachedResult => "cache-load",
            RunStage::Compiling => "compile",
            RunStage::RunningTransient => "transient",
            RunStage::SavingResults => "save",
            RunStage::Completed => "done",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransientProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub step: usize,
    pub power: f64,
    pub substeps: usize,
}

impl From<SimProgress> for TransientProgress {
    fn from(p: SimProgress) -> Self {
        Self {
            sim_time_s: p.sim_time_s,
            t_end_s: p.t_end_s,
            fraction_complete: p.fraction_complete,
            step: p.step,
            power: p.power,
            substeps: p.substeps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub transient: Option<TransientProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            transient: None,
        }
    }
}
