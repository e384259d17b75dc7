use crate::{
    regressed_interventions, reject_if_intervention_regresses, ScenarioMetrics,
    REGRESSION_TOLERANCE,
};
use triad_scenarios::{AnalysisReport, ScenarioConfig, ScenarioDriver, ScenarioKind, ScenarioSummary};
use triad_solver::{Integrator, IntegratorChoice};

fn canonical_report() -> AnalysisReport {
    let driver = ScenarioDriver::new(ScenarioConfig::canonical(), IntegratorChoice::default());
    let outcomes = driver.run_all();
    AnalysisReport::build(driver.integrator().name(), &driver.config().grid, &outcomes)
}

fn summary(kind: ScenarioKind, final_coherence: f64) -> ScenarioSummary {
    ScenarioSummary {
        kind,
        power_scenario: kind.power_scenario(),
        final_coherence,
        final_dwelling: 1.0 - final_coherence,
        final_power_watts: 1.0e7 * final_coherence,
        peak_power_watts: 1.0e7 * final_coherence,
        late_stage_mean: [final_coherence; 3],
        late_stage_synergy: final_coherence * final_coherence,
        dwelling_trapped: final_coherence < 0.5,
    }
}

#[test]
fn observe_sets_labelled_gauges() {
    let metrics = ScenarioMetrics::new().unwrap();
    metrics.observe(&summary(ScenarioKind::PhaseOne, 0.9));
    metrics.observe(&summary(ScenarioKind::NoIntervention, 0.01));

    let coherence = metrics.final_coherence.with_label_values(&["phase1"]).get();
    assert!((coherence - 0.9).abs() < 1e-12);
    assert_eq!(metrics.dwelling_trapped.with_label_values(&["none"]).get(), 1.0);
    assert_eq!(metrics.dwelling_trapped.with_label_values(&["phase1"]).get(), 0.0);
}

#[test]
fn render_exposes_every_family() {
    let metrics = ScenarioMetrics::new().unwrap();
    metrics.observe(&summary(ScenarioKind::BothPhases, 0.97));
    let text = metrics.render().unwrap();
    for family in [
        "triad_final_coherence",
        "triad_final_dwelling",
        "triad_final_power_watts",
        "triad_late_stage_synergy",
        "triad_dwelling_trapped",
    ] {
        assert!(text.contains(family), "missing {family}");
    }
    assert!(text.contains("scenario=\"both\""));
}

#[test]
fn separate_instances_do_not_collide() {
    let a = ScenarioMetrics::new().unwrap();
    let b = ScenarioMetrics::new().unwrap();
    a.observe(&summary(ScenarioKind::PhaseOne, 0.8));
    assert!(!b.render().unwrap().contains("phase1"));
}

#[test]
fn guard_rejects_regressing_candidate() {
    let metrics = ScenarioMetrics::new().unwrap();
    let baseline = summary(ScenarioKind::PhaseOne, 0.95);
    assert!(reject_if_intervention_regresses(
        &metrics,
        &baseline,
        &summary(ScenarioKind::BothPhases, 0.4)
    ));
    assert!(!reject_if_intervention_regresses(
        &metrics,
        &baseline,
        &summary(ScenarioKind::BothPhases, 0.97)
    ));
    let recorded = metrics.final_coherence.with_label_values(&["both"]).get();
    assert!((recorded - 0.97).abs() < 1e-12);
}

#[test]
fn guard_ignores_integration_noise() {
    let metrics = ScenarioMetrics::new().unwrap();
    let baseline = summary(ScenarioKind::PhaseOne, 0.973869177808662);
    let settled = summary(ScenarioKind::BothPhases, 0.973869177629762);
    assert!(!reject_if_intervention_regresses(&metrics, &baseline, &settled));

    let slipped = summary(
        ScenarioKind::BothPhases,
        baseline.final_coherence - 10.0 * REGRESSION_TOLERANCE,
    );
    assert!(reject_if_intervention_regresses(&metrics, &baseline, &slipped));
}

#[test]
fn canonical_interventions_do_not_regress() {
    let report = canonical_report();
    let metrics = ScenarioMetrics::new().unwrap();
    let phase_one = report.summary(ScenarioKind::PhaseOne).unwrap();
    let both = report.summary(ScenarioKind::BothPhases).unwrap();
    assert!(!reject_if_intervention_regresses(&metrics, phase_one, both));
    assert!(regressed_interventions(&metrics, &report).is_empty());
}

#[test]
fn regressed_pairs_are_reported() {
    let mut report = canonical_report();
    for s in report.summaries.iter_mut() {
        if s.kind == ScenarioKind::BothPhases {
            s.final_coherence = 0.1;
        }
    }
    let metrics = ScenarioMetrics::new().unwrap();
    assert_eq!(
        regressed_interventions(&metrics, &report),
        vec![(ScenarioKind::PhaseOne, ScenarioKind::BothPhases)]
    );
    report.summaries.retain(|s| s.kind != ScenarioKind::PhaseOne);
    assert!(regressed_interventions(&metrics, &report).is_empty());
}
