use crate::driver::{ScenarioKind, ScenarioRun};
use crate::error::ScenarioError;
use serde::Serialize;
use triad_core::Trajectory;
use triad_power::PowerScenario;

/// Samples averaged for the late-stage subsystem levels.
pub const LATE_STAGE_WINDOW: usize = 100;

/// Final coherence below the activation threshold counts as trapped.
pub const TRAP_COHERENCE: f64 = 0.5;

/// Mean of x1, x2, x3 over the last `window` samples (or all of them when
/// the trajectory is shorter). `None` for an empty trajectory or a zero
/// window.
pub fn late_stage_mean(trajectory: &Trajectory, window: usize) -> Option<[f64; 3]> {
    let states = trajectory.states();
    let take = window.min(states.len());
    if take == 0 {
        return None;
    }
    let tail = &states[states.len() - take..];
    let mut sum = [0.0; 3];
    for s in tail {
        for (acc, v) in sum.iter_mut().zip(s.primary()) {
            *acc += v;
        }
    }
    Some(sum.map(|v| v / take as f64))
}

/// Headline numbers of one scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub kind: ScenarioKind,
    pub power_scenario: PowerScenario,
    pub final_coherence: f64,
    pub final_dwelling: f64,
    pub final_power_watts: f64,
    pub peak_power_watts: f64,
    pub late_stage_mean: [f64; 3],
    /// Product of the late-stage means of x2 and x3.
    pub late_stage_synergy: f64,
    pub dwelling_trapped: bool,
}

impl ScenarioSummary {
    pub fn from_run(run: &ScenarioRun) -> Result<Self, ScenarioError> {
        let empty = || ScenarioError::EmptyTrajectory(run.kind);
        let last = run.trajectory.last().ok_or_else(empty)?;
        let late = late_stage_mean(&run.trajectory, LATE_STAGE_WINDOW).ok_or_else(empty)?;
        let final_power_watts = run.power.final_watts().ok_or_else(empty)?;
        let peak_power_watts = run.power.peak_watts().ok_or_else(empty)?;
        let final_coherence = last.coherence();

        Ok(Self {
            kind: run.kind,
            power_scenario: run.power.scenario(),
            final_coherence,
            final_dwelling: last.dwelling,
            final_power_watts,
            peak_power_watts,
            late_stage_mean: late,
            late_stage_synergy: late[1] * late[2],
            dwelling_trapped: final_coherence < TRAP_COHERENCE,
        })
    }
}
