#![forbid(unsafe_code)]

pub mod analysis;
pub mod driver;
pub mod error;
pub mod report;

pub use analysis::{late_stage_mean, ScenarioSummary, LATE_STAGE_WINDOW, TRAP_COHERENCE};
pub use driver::{
    NudgeSchedule, ScenarioConfig, ScenarioDriver, ScenarioKind, ScenarioOutcome, ScenarioRun,
};
pub use error::ScenarioError;
pub use report::{format_watts, series_rows, AnalysisReport, HorizonInfo, ScenarioFailure, SeriesRow};
