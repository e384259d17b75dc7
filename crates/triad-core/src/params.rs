use crate::error::TriadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Additive boost applied to a nudged subsystem, scaled by its headroom.
pub const NUDGE_GAIN: f64 = 0.5;
/// Width of every intervention window in model time units.
pub const NUDGE_WIDTH: f64 = 2.0;

pub const DWELLING_RISE: &str = "dwelling_rise";
pub const DWELLING_FADE: &str = "dwelling_fade";
pub const COUPLING_BOOST: &str = "coupling_boost";
pub const DECAY_RELIEF: &str = "decay_relief";
pub const BASE_DECAY: &str = "base_decay";
pub const NUDGE_TIME1: &str = "nudge_time1";
pub const NUDGE_TIME2: &str = "nudge_time2";

pub const REQUIRED_KEYS: [&str; 5] = [
    DWELLING_RISE,
    DWELLING_FADE,
    COUPLING_BOOST,
    DECAY_RELIEF,
    BASE_DECAY,
];

fn is_known_key(key: &str) -> bool {
    REQUIRED_KEYS.contains(&key) || key == NUDGE_TIME1 || key == NUDGE_TIME2
}

/// Half-open window `[start, start + NUDGE_WIDTH)`.
pub fn nudge_window_contains(start: f64, t: f64) -> bool {
    start <= t && t < start + NUDGE_WIDTH
}

/// Coefficients of one scenario run. A present nudge time means the
/// corresponding intervention is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct ParameterSet {
    pub dwelling_rise: f64,
    pub dwelling_fade: f64,
    pub coupling_boost: f64,
    pub decay_relief: f64,
    pub base_decay: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nudge_time1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nudge_time2: Option<f64>,
}

impl ParameterSet {
    /// Reference coefficients without interventions.
    pub const fn baseline() -> Self {
        Self {
            dwelling_rise: 0.35,
            dwelling_fade: 0.45,
            coupling_boost: 0.8,
            decay_relief: 0.6,
            base_decay: 0.22,
            nudge_time1: None,
            nudge_time2: None,
        }
    }

    pub fn with_nudge_time1(self, t: f64) -> Self {
        Self {
            nudge_time1: Some(t),
            ..self
        }
    }

    pub fn with_nudge_time2(self, t: f64) -> Self {
        Self {
            nudge_time2: Some(t),
            ..self
        }
    }

    pub fn without_nudges(self) -> Self {
        Self {
            nudge_time1: None,
            nudge_time2: None,
            ..self
        }
    }

    pub fn first_nudge_active(&self, t: f64) -> bool {
        self.nudge_time1
            .is_some_and(|start| nudge_window_contains(start, t))
    }

    pub fn second_nudge_active(&self, t: f64) -> bool {
        self.nudge_time2
            .is_some_and(|start| nudge_window_contains(start, t))
    }

    /// Builds a set from string keys. Required coefficients have no
    /// defaults; unrecognized keys are rejected.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self, TriadError> {
        if let Some(unknown) = map.keys().find(|k| !is_known_key(k)) {
            return Err(TriadError::UnknownParameter(unknown.clone()));
        }
        let required = |key: &'static str| {
            map.get(key)
                .copied()
                .ok_or(TriadError::MissingParameter(key))
        };
        Ok(Self {
            dwelling_rise: required(DWELLING_RISE)?,
            dwelling_fade: required(DWELLING_FADE)?,
            coupling_boost: required(COUPLING_BOOST)?,
            decay_relief: required(DECAY_RELIEF)?,
            base_decay: required(BASE_DECAY)?,
            nudge_time1: map.get(NUDGE_TIME1).copied(),
            nudge_time2: map.get(NUDGE_TIME2).copied(),
        })
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert(DWELLING_RISE.to_string(), self.dwelling_rise);
        map.insert(DWELLING_FADE.to_string(), self.dwelling_fade);
        map.insert(COUPLING_BOOST.to_string(), self.coupling_boost);
        map.insert(DECAY_RELIEF.to_string(), self.decay_relief);
        map.insert(BASE_DECAY.to_string(), self.base_decay);
        if let Some(t) = self.nudge_time1 {
            map.insert(NUDGE_TIME1.to_string(), t);
        }
        if let Some(t) = self.nudge_time2 {
            map.insert(NUDGE_TIME2.to_string(), t);
        }
        map
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::baseline()
    }
}

impl TryFrom<BTreeMap<String, f64>> for ParameterSet {
    type Error = TriadError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_map(&map)
    }
}
