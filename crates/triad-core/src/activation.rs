use serde::{Deserialize, Serialize};

/// Hill-type activation `gamma * x^n / (threshold^n + x^n)`.
///
/// Monotonically increasing for `x >= 0`, zero at the origin and saturating
/// at `gamma`. `steepness` sets how sharp the transition around `threshold`
/// is. Inputs must be non-negative; the dynamics clamp the state first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub gamma: f64,
    pub threshold: f64,
    pub steepness: f64,
}

impl Activation {
    pub const fn new(gamma: f64, threshold: f64, steepness: f64) -> Self {
        Self {
            gamma,
            threshold,
            steepness,
        }
    }

    pub fn apply(&self, x: f64) -> f64 {
        // Same curve as the ratio of powers, rearranged so huge x saturates
        // to gamma instead of inf/inf. x == 0 gives gamma / inf == 0.
        self.gamma / (1.0 + (self.threshold / x).powf(self.steepness))
    }
}

impl Default for Activation {
    fn default() -> Self {
        Self::new(10.0, 0.5, 6.0)
    }
}

/// Activation with the default shape.
pub fn hill(x: f64) -> f64 {
    Activation::default().apply(x)
}
