use prometheus::{register_gauge_vec_with_registry, Encoder, GaugeVec, Registry, TextEncoder};
use triad_scenarios::{AnalysisReport, ScenarioSummary};

/// Per-scenario gauges, labelled by scenario tag, on a registry owned by
/// this value so several runs can be exported side by side.
pub struct ScenarioMetrics {
    registry: Registry,
    pub final_coherence: GaugeVec,
    pub final_dwelling: GaugeVec,
    pub final_power_watts: GaugeVec,
    pub late_stage_synergy: GaugeVec,
    pub dwelling_trapped: GaugeVec,
}

impl ScenarioMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let final_coherence = register_gauge_vec_with_registry!(
            "triad_final_coherence",
            "Mean subsystem level at the last sample",
            &["scenario"],
            registry
        )?;

        let final_dwelling = register_gauge_vec_with_registry!(
            "triad_final_dwelling",
            "Dwelling level at the last sample",
            &["scenario"],
            registry
        )?;

        let final_power_watts = register_gauge_vec_with_registry!(
            "triad_final_power_watts",
            "Output power at the last sample",
            &["scenario"],
            registry
        )?;

        let late_stage_synergy = register_gauge_vec_with_registry!(
            "triad_late_stage_synergy",
            "Product of late-stage mean x2 and x3",
            &["scenario"],
            registry
        )?;

        let dwelling_trapped = register_gauge_vec_with_registry!(
            "triad_dwelling_trapped",
            "1 when the scenario ended below the trap coherence",
            &["scenario"],
            registry
        )?;

        Ok(Self {
            registry,
            final_coherence,
            final_dwelling,
            final_power_watts,
            late_stage_synergy,
            dwelling_trapped,
        })
    }

    pub fn observe(&self, summary: &ScenarioSummary) {
        let label = summary.kind.to_string();
        let labels = [label.as_str()];
        self.final_coherence
            .with_label_values(&labels)
            .set(summary.final_coherence);
        self.final_dwelling
            .with_label_values(&labels)
            .set(summary.final_dwelling);
        self.final_power_watts
            .with_label_values(&labels)
            .set(summary.final_power_watts);
        self.late_stage_synergy
            .with_label_values(&labels)
            .set(summary.late_stage_synergy);
        self.dwelling_trapped
            .with_label_values(&labels)
            .set(if summary.dwelling_trapped { 1.0 } else { 0.0 });
    }

    pub fn observe_report(&self, report: &AnalysisReport) {
        for summary in &report.summaries {
            self.observe(summary);
        }
    }

    /// Text exposition of every gauge in this registry.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}
