use crate::error::ScenarioError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use triad_core::{ParameterSet, StateVector, TimeGrid, Trajectory, TriadicSystem, INITIAL_STATE};
use triad_power::{power_curve, PowerCurve, PowerScenario};
use triad_solver::Integrator;

/// The three comparison runs. Each kind is paired with a fixed power
/// scaling law; the pairing is not derived from which nudges fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    NoIntervention,
    PhaseOne,
    BothPhases,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [Self::NoIntervention, Self::PhaseOne, Self::BothPhases];

    pub fn power_scenario(self) -> PowerScenario {
        match self {
            Self::NoIntervention => PowerScenario::None,
            Self::PhaseOne => PowerScenario::Phase1,
            Self::BothPhases => PowerScenario::Both,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoIntervention => "No Interventions",
            Self::PhaseOne => "Phase 1 Only",
            Self::BothPhases => "Both Phases",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.power_scenario().tag())
    }
}

/// Start times of the two intervention windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NudgeSchedule {
    pub phase_one: f64,
    pub phase_two: f64,
}

impl Default for NudgeSchedule {
    fn default() -> Self {
        Self {
            phase_one: 10.0,
            phase_two: 25.0,
        }
    }
}

/// Inputs shared by every scenario. Built once, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub baseline: ParameterSet,
    pub initial_state: StateVector,
    pub grid: TimeGrid,
    pub schedule: NudgeSchedule,
}

impl ScenarioConfig {
    /// Baseline coefficients, `[0.2, 0.1, 0.15, 0.6]`, 500 samples over
    /// [0, 50] and nudges at 10 and 25.
    pub fn canonical() -> Self {
        Self {
            baseline: ParameterSet::baseline(),
            initial_state: INITIAL_STATE,
            grid: TimeGrid::canonical(),
            schedule: NudgeSchedule::default(),
        }
    }

    pub fn with_horizon(self, start: f64, end: f64, samples: usize) -> Result<Self, ScenarioError> {
        Ok(Self {
            grid: TimeGrid::linspace(start, end, samples)?,
            ..self
        })
    }

    /// Any nudge times present on the baseline are replaced by the schedule.
    pub fn parameters_for(&self, kind: ScenarioKind) -> ParameterSet {
        let base = self.baseline.without_nudges();
        match kind {
            ScenarioKind::NoIntervention => base,
            ScenarioKind::PhaseOne => base.with_nudge_time1(self.schedule.phase_one),
            ScenarioKind::BothPhases => base
                .with_nudge_time1(self.schedule.phase_one)
                .with_nudge_time2(self.schedule.phase_two),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

/// One finished scenario: its inputs, trajectory and power curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRun {
    pub kind: ScenarioKind,
    pub parameters: ParameterSet,
    pub trajectory: Trajectory,
    pub power: PowerCurve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub kind: ScenarioKind,
    pub result: Result<ScenarioRun, ScenarioError>,
}

pub struct ScenarioDriver<I> {
    config: ScenarioConfig,
    integrator: I,
}

impl<I: Integrator> ScenarioDriver<I> {
    pub fn new(config: ScenarioConfig, integrator: I) -> Self {
        Self { config, integrator }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    pub fn parameter_sets(&self) -> [(ScenarioKind, ParameterSet); 3] {
        ScenarioKind::ALL.map(|kind| (kind, self.config.parameters_for(kind)))
    }

    pub fn run(&self, kind: ScenarioKind) -> Result<ScenarioRun, ScenarioError> {
        let parameters = self.config.parameters_for(kind);
        let system = TriadicSystem::new(parameters);
        let trajectory = self
            .integrator
            .integrate(&system, self.config.initial_state, &self.config.grid)
            .map_err(|source| ScenarioError::Integration { kind, source })?;
        let power = power_curve(&trajectory, kind.power_scenario());

        if let Some(last) = trajectory.last() {
            tracing::info!(
                scenario = %kind,
                integrator = self.integrator.name(),
                final_coherence = last.coherence(),
                final_dwelling = last.dwelling,
                "scenario finished"
            );
        }
        Ok(ScenarioRun {
            kind,
            parameters,
            trajectory,
            power,
        })
    }

    /// Runs every scenario in parallel. Outcomes come back in
    /// [`ScenarioKind::ALL`] order; a failed scenario does not stop the
    /// others.
    pub fn run_all(&self) -> Vec<ScenarioOutcome> {
        ScenarioKind::ALL
            .par_iter()
            .map(|&kind| {
                let result = self.run(kind);
                if let Err(err) = &result {
                    tracing::warn!(scenario = %kind, error = %err, "scenario failed");
                }
                ScenarioOutcome { kind, result }
            })
            .collect()
    }
}
