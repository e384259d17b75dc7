use crate::error::TriadError;
use serde::{Deserialize, Serialize};

/// Number of integrated components: three subsystems plus dwelling.
pub const STATE_DIM: usize = 4;

pub const DEFAULT_HORIZON: f64 = 50.0;
pub const DEFAULT_SAMPLES: usize = 500;

/// Starting point shared by every comparison scenario.
pub const INITIAL_STATE: StateVector = StateVector::new(0.2, 0.1, 0.15, 0.6);

/// Maturity of the three coupled subsystems and the auxiliary dwelling level.
///
/// Values are nominally in [0, 1]. The integrator may carry them slightly
/// outside between steps; every nonlinear consumer goes through [`clamped`].
///
/// [`clamped`]: StateVector::clamped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
    pub dwelling: f64,
}

impl StateVector {
    pub const fn new(x1: f64, x2: f64, x3: f64, dwelling: f64) -> Self {
        Self {
            x1,
            x2,
            x3,
            dwelling,
        }
    }

    pub const fn to_array(self) -> [f64; STATE_DIM] {
        [self.x1, self.x2, self.x3, self.dwelling]
    }

    /// Element-wise clamp into [0, 1]. NaN components stay NaN.
    pub fn clamped(self) -> Self {
        Self {
            x1: self.x1.clamp(0.0, 1.0),
            x2: self.x2.clamp(0.0, 1.0),
            x3: self.x3.clamp(0.0, 1.0),
            dwelling: self.dwelling.clamp(0.0, 1.0),
        }
    }

    /// Mean of the three subsystem levels.
    pub fn coherence(&self) -> f64 {
        (self.x1 + self.x2 + self.x3) / 3.0
    }

    /// Product of the second and third subsystems.
    pub fn synergy(&self) -> f64 {
        self.x2 * self.x3
    }

    pub fn primary(&self) -> [f64; 3] {
        [self.x1, self.x2, self.x3]
    }
}

impl From<[f64; STATE_DIM]> for StateVector {
    fn from(y: [f64; STATE_DIM]) -> Self {
        Self::new(y[0], y[1], y[2], y[3])
    }
}

impl From<StateVector> for [f64; STATE_DIM] {
    fn from(s: StateVector) -> Self {
        s.to_array()
    }
}

/// Strictly increasing, finite sample times shared by all scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    pub fn new(times: Vec<f64>) -> Result<Self, TriadError> {
        if times.is_empty() {
            return Err(TriadError::InvalidTimeGrid(
                "grid must contain at least one sample".into(),
            ));
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(TriadError::InvalidTimeGrid(format!(
                "sample {i} is not finite"
            )));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(TriadError::InvalidTimeGrid(format!(
                "samples {} and {} are not strictly increasing",
                i,
                i + 1
            )));
        }
        Ok(Self { times })
    }

    /// Evenly spaced samples over `[start, end]`, both ends included.
    pub fn linspace(start: f64, end: f64, samples: usize) -> Result<Self, TriadError> {
        if samples < 2 {
            return Err(TriadError::InvalidTimeGrid(format!(
                "linspace needs at least 2 samples, got {samples}"
            )));
        }
        if !(start.is_finite() && end.is_finite()) || end <= start {
            return Err(TriadError::InvalidTimeGrid(format!(
                "linspace bounds [{start}, {end}] are not an increasing finite interval"
            )));
        }
        Self::new(linspace_samples(start, end, samples))
    }

    /// The 500-sample grid over [0, 50] used by the comparison runs.
    pub fn canonical() -> Self {
        Self {
            times: linspace_samples(0.0, DEFAULT_HORIZON, DEFAULT_SAMPLES),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.times[0]
    }

    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.iter().copied()
    }
}

fn linspace_samples(start: f64, end: f64, samples: usize) -> Vec<f64> {
    let step = (end - start) / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            if i == samples - 1 {
                end
            } else {
                start + step * i as f64
            }
        })
        .collect()
}

/// One integration result: a state per grid sample. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<StateVector>,
}

impl Trajectory {
    pub fn new(grid: &TimeGrid, states: Vec<StateVector>) -> Result<Self, TriadError> {
        if states.len() != grid.len() {
            return Err(TriadError::TrajectoryLength {
                states: states.len(),
                times: grid.len(),
            });
        }
        Ok(Self {
            times: grid.as_slice().to_vec(),
            states,
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[StateVector] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last(&self) -> Option<&StateVector> {
        self.states.last()
    }

    pub fn coherence_series(&self) -> Vec<f64> {
        self.states.iter().map(StateVector::coherence).collect()
    }

    /// Sample whose time is closest to `t`.
    pub fn nearest(&self, t: f64) -> Option<(f64, &StateVector)> {
        let idx = match self.times.binary_search_by(|sample| sample.total_cmp(&t)) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) if i >= self.times.len() => self.times.len().checked_sub(1)?,
            Err(i) => {
                if (t - self.times[i - 1]) <= (self.times[i] - t) {
                    i - 1
                } else {
                    i
                }
            }
        };
        self.states.get(idx).map(|s| (self.times[idx], s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &StateVector)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }
}
