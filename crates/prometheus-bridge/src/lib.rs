pub mod guards;
pub mod metrics;
#[cfg(test)]
mod tests;

pub use guards::{reject_if_intervention_regresses, regressed_interventions, REGRESSION_TOLERANCE};
pub use metrics::ScenarioMetrics;
