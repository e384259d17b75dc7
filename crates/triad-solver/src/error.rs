use thiserror::Error;
use triad_core::TriadError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("state became non-finite near t = {t}")]
    NonFiniteState { t: f64 },
    #[error("step size underflow at t = {t} (h = {h:e})")]
    StepSizeUnderflow { t: f64, h: f64 },
    #[error("exceeded {max_steps} steps before reaching t = {t}")]
    TooManySteps { max_steps: usize, t: f64 },
    #[error("invalid integrator configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Core(#[from] TriadError),
}
