use thiserror::Error;

/// Usage errors raised by the model's data types and the power mapping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriadError {
    #[error("invalid scenario tag '{0}': expected one of none, phase1, both")]
    InvalidScenario(String),
    #[error("parameter set is missing required key '{0}'")]
    MissingParameter(&'static str),
    #[error("unknown parameter key '{0}'")]
    UnknownParameter(String),
    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),
    #[error("trajectory has {states} states but the time grid has {times} samples")]
    TrajectoryLength { states: usize, times: usize },
}
