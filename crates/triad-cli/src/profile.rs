use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use triad_core::{ParameterSet, StateVector, DEFAULT_SAMPLES};
use triad_scenarios::{NudgeSchedule, ScenarioConfig};
use triad_solver::IntegratorChoice;

/// JSON run profile. Every section is optional; absent sections fall back
/// to the canonical configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationProfile {
    pub parameters: Option<ParameterSet>,
    pub initial_state: Option<StateVector>,
    pub horizon: Option<HorizonSection>,
    pub nudges: Option<NudgeSchedule>,
    pub integrator: Option<IntegratorChoice>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HorizonSection {
    #[serde(default)]
    pub start: f64,
    pub end: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

/// Command-line values that take precedence over the profile.
#[derive(Debug, Default)]
pub struct Overrides {
    pub integrator: Option<IntegratorChoice>,
    pub horizon_end: Option<f64>,
    pub samples: Option<usize>,
}

pub fn parse_profile(text: &str) -> Result<SimulationProfile> {
    serde_json::from_str(text).context("profile does not match the expected schema")
}

pub fn load_profile(path: &Path) -> Result<SimulationProfile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    parse_profile(&text).with_context(|| format!("parsing profile {}", path.display()))
}

impl SimulationProfile {
    /// Driver configuration and integrator after applying `overrides`.
    /// Nudge times written into `parameters` seed the schedule unless a
    /// `nudges` section is present.
    pub fn resolve(&self, overrides: &Overrides) -> Result<(ScenarioConfig, IntegratorChoice)> {
        let canonical = ScenarioConfig::canonical();
        let baseline = self.parameters.unwrap_or(canonical.baseline);
        let schedule = self.nudges.unwrap_or_else(|| {
            let fallback = NudgeSchedule::default();
            NudgeSchedule {
                phase_one: baseline.nudge_time1.unwrap_or(fallback.phase_one),
                phase_two: baseline.nudge_time2.unwrap_or(fallback.phase_two),
            }
        });

        let start = self.horizon.map_or(canonical.grid.start(), |h| h.start);
        let end = overrides
            .horizon_end
            .or(self.horizon.map(|h| h.end))
            .unwrap_or(canonical.grid.end());
        let samples = overrides
            .samples
            .or(self.horizon.map(|h| h.samples))
            .unwrap_or(canonical.grid.len());

        let config = ScenarioConfig {
            baseline,
            initial_state: self.initial_state.unwrap_or(canonical.initial_state),
            schedule,
            ..canonical
        }
        .with_horizon(start, end, samples)
        .context("invalid horizon")?;

        let integrator = overrides.integrator.or(self.integrator).unwrap_or_default();
        Ok((config, integrator))
    }
}
