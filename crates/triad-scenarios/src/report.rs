use crate::analysis::ScenarioSummary;
use crate::driver::{ScenarioKind, ScenarioOutcome, ScenarioRun};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use triad_core::TimeGrid;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonInfo {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl From<&TimeGrid> for HorizonInfo {
    fn from(grid: &TimeGrid) -> Self {
        Self {
            start: grid.start(),
            end: grid.end(),
            samples: grid.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioFailure {
    pub kind: ScenarioKind,
    pub message: String,
}

/// Comparison of the scenario runs from one driver invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub date: String,
    pub integrator: String,
    pub horizon: HorizonInfo,
    pub summaries: Vec<ScenarioSummary>,
    pub failures: Vec<ScenarioFailure>,
    /// Final power of the dual-intervention run over the phase-one run.
    pub phase_two_gain: Option<f64>,
}

impl AnalysisReport {
    pub fn build(integrator: &str, grid: &TimeGrid, outcomes: &[ScenarioOutcome]) -> Self {
        let mut summaries = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            let summary = outcome
                .result
                .as_ref()
                .map_err(|err| err.clone())
                .and_then(ScenarioSummary::from_run);
            match summary {
                Ok(summary) => {
                    if summary.dwelling_trapped {
                        tracing::warn!(
                            scenario = %summary.kind,
                            final_coherence = summary.final_coherence,
                            "scenario ended in the dwelling trap"
                        );
                    }
                    summaries.push(summary);
                }
                Err(err) => failures.push(ScenarioFailure {
                    kind: outcome.kind,
                    message: err.to_string(),
                }),
            }
        }

        let final_power = |kind: ScenarioKind| {
            summaries
                .iter()
                .find(|s| s.kind == kind)
                .map(|s| s.final_power_watts)
        };
        let phase_two_gain = match (
            final_power(ScenarioKind::PhaseOne),
            final_power(ScenarioKind::BothPhases),
        ) {
            (Some(p1), Some(both)) if p1 > 0.0 => Some(both / p1),
            _ => None,
        };

        Self {
            run_id: Uuid::new_v4(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            integrator: integrator.to_string(),
            horizon: HorizonInfo::from(grid),
            summaries,
            failures,
            phase_two_gain,
        }
    }

    pub fn summary(&self, kind: ScenarioKind) -> Option<&ScenarioSummary> {
        self.summaries.iter().find(|s| s.kind == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Console summary: final power, late-stage levels and the headline
    /// comparisons.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "TRIADIC PHASE MODEL - SCENARIO ANALYSIS")?;
        writeln!(
            f,
            "run {} on {} | {} over [{}, {}] with {} samples",
            self.run_id,
            self.date,
            self.integrator,
            self.horizon.start,
            self.horizon.end,
            self.horizon.samples
        )?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\n--- FINAL POWER OUTPUTS ---")?;
        for s in &self.summaries {
            writeln!(
                f,
                "{:<18} {} ({:.1}% coherence)",
                format!("{}:", s.kind.label()),
                format_watts(s.final_power_watts),
                s.final_coherence * 100.0
            )?;
        }

        writeln!(f, "\n--- LATE-STAGE SUBSYSTEM STATES (last samples) ---")?;
        for s in &self.summaries {
            let [x1, x2, x3] = s.late_stage_mean;
            writeln!(
                f,
                "{:<18} x1={x1:.3}, x2={x2:.3}, x3={x3:.3}",
                format!("{}:", s.kind.label()),
            )?;
        }

        writeln!(f, "\n--- KEY INSIGHTS ---")?;
        if let Some(p1) = self.summary(ScenarioKind::PhaseOne) {
            writeln!(
                f,
                "* Phase 1 reaches {} through the baseline subsystem",
                format_watts(p1.final_power_watts)
            )?;
        }
        if let Some(gain) = self.phase_two_gain {
            writeln!(f, "* Phase 2 adds a {gain:.0}x boost via synergy")?;
        }
        if let Some(both) = self.summary(ScenarioKind::BothPhases) {
            writeln!(f, "* Late-stage synergy (x2*x3): {:.3}", both.late_stage_synergy)?;
        }
        for s in self.summaries.iter().filter(|s| s.dwelling_trapped) {
            writeln!(
                f,
                "* {} stays at {:.1}% coherence (dwelling trap)",
                s.kind.label(),
                s.final_coherence * 100.0
            )?;
        }

        if !self.failures.is_empty() {
            writeln!(f, "\n--- FAILED SCENARIOS ---")?;
            for failure in &self.failures {
                writeln!(f, "{}: {}", failure.kind.label(), failure.message)?;
            }
        }
        writeln!(f, "{rule}")?;
        Ok(())
    }
}

/// Formats watts with the largest SI prefix (up to giga) that keeps the
/// value at or above one.
pub fn format_watts(watts: f64) -> String {
    let magnitude = watts.abs();
    let (scale, unit) = if magnitude >= 1e9 {
        (1e9, "GW")
    } else if magnitude >= 1e6 {
        (1e6, "MW")
    } else if magnitude >= 1e3 {
        (1e3, "kW")
    } else {
        (1.0, "W")
    };
    format!("{:.3} {unit}", watts / scale)
}

/// One exported sample of a scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub t: f64,
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
    pub dwelling: f64,
    pub coherence: f64,
    pub power_watts: f64,
}

pub fn series_rows(run: &ScenarioRun) -> Vec<SeriesRow> {
    run.trajectory
        .iter()
        .zip(run.power.watts())
        .map(|((t, s), &power_watts)| SeriesRow {
            t,
            x1: s.x1,
            x2: s.x2,
            x3: s.x3,
            dwelling: s.dwelling,
            coherence: s.coherence(),
            power_watts,
        })
        .collect()
}
