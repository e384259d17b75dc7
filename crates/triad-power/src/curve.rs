use crate::scenario::PowerScenario;
use serde::Serialize;
use triad_core::{StateVector, Trajectory, TriadError};

/// Power density of the modeled reactor, W/cm³.
pub const BASE_DENSITY: f64 = 10.0;
/// Reactor volume, cm³ (one cubic metre).
pub const REACTOR_VOLUME: f64 = 1_000_000.0;
/// Extra multiple reached when `x2 * x3 == 1`.
pub const SYNERGY_GAIN: f64 = 99.0;

/// Output at full first-subsystem maturity without synergy.
pub fn rated_power() -> f64 {
    BASE_DENSITY * REACTOR_VOLUME
}

/// `1 + 99 * synergy²`, between 1 and 100 for synergy in [0, 1].
pub fn quantum_factor(synergy: f64) -> f64 {
    1.0 + SYNERGY_GAIN * synergy * synergy
}

// NaN is kept so a broken trajectory stays visible in the curve.
fn floor_at_zero(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}

/// Power in watts for a single state. Only the subsystem levels are read.
/// Levels below zero count as zero; levels above one are used as they are.
pub fn instantaneous_power(state: &StateVector, scenario: PowerScenario) -> f64 {
    let x1 = floor_at_zero(state.x1);
    match scenario {
        PowerScenario::None => 0.0,
        PowerScenario::Phase1 => rated_power() * x1,
        PowerScenario::Both => {
            let synergy = floor_at_zero(state.x2) * floor_at_zero(state.x3);
            rated_power() * x1 * quantum_factor(synergy)
        }
    }
}

/// Power over time for one trajectory, sample for sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCurve {
    scenario: PowerScenario,
    watts: Vec<f64>,
}

impl PowerCurve {
    pub fn scenario(&self) -> PowerScenario {
        self.scenario
    }

    pub fn watts(&self) -> &[f64] {
        &self.watts
    }

    pub fn len(&self) -> usize {
        self.watts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watts.is_empty()
    }

    pub fn final_watts(&self) -> Option<f64> {
        self.watts.last().copied()
    }

    pub fn peak_watts(&self) -> Option<f64> {
        self.watts.iter().copied().reduce(f64::max)
    }
}

pub fn power_curve(trajectory: &Trajectory, scenario: PowerScenario) -> PowerCurve {
    let watts = trajectory
        .states()
        .iter()
        .map(|s| instantaneous_power(s, scenario))
        .collect();
    PowerCurve { scenario, watts }
}

/// Like [`power_curve`] but selects the scenario by its tag. Unknown tags
/// are an error rather than a silent `none`.
pub fn power_curve_for_tag(trajectory: &Trajectory, tag: &str) -> Result<PowerCurve, TriadError> {
    let scenario = tag.parse()?;
    Ok(power_curve(trajectory, scenario))
}
