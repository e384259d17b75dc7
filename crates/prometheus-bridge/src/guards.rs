use crate::ScenarioMetrics;
use triad_scenarios::{AnalysisReport, ScenarioKind, ScenarioSummary};

/// Coherence a candidate may lose against its baseline before it counts
/// as a regression. Runs that settle on the same attractor differ only by
/// integration noise, well below this.
pub const REGRESSION_TOLERANCE: f64 = 1e-6;

/// Records `candidate` and reports whether it finished more than
/// [`REGRESSION_TOLERANCE`] below the coherence of `baseline`.
pub fn reject_if_intervention_regresses(
    metrics: &ScenarioMetrics,
    baseline: &ScenarioSummary,
    candidate: &ScenarioSummary,
) -> bool {
    metrics.observe(candidate);
    candidate.final_coherence < baseline.final_coherence - REGRESSION_TOLERANCE
}

/// Checks each intervention against the scenario it extends
/// (phase one against none, both phases against phase one) and returns the
/// `(baseline, candidate)` pairs that regressed. Pairs with a missing
/// summary are skipped.
pub fn regressed_interventions(
    metrics: &ScenarioMetrics,
    report: &AnalysisReport,
) -> Vec<(ScenarioKind, ScenarioKind)> {
    [
        (ScenarioKind::NoIntervention, ScenarioKind::PhaseOne),
        (ScenarioKind::PhaseOne, ScenarioKind::BothPhases),
    ]
    .into_iter()
    .filter(|&(baseline, candidate)| {
        match (report.summary(baseline), report.summary(candidate)) {
            (Some(b), Some(c)) => reject_if_intervention_regresses(metrics, b, c),
            _ => false,
        }
    })
    .collect()
}
