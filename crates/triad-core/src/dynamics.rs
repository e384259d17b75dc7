use crate::activation::Activation;
use crate::params::{ParameterSet, NUDGE_GAIN};
use crate::state::{StateVector, STATE_DIM};
use crate::system::OdeSystem;
use serde::{Deserialize, Serialize};

/// Per-subsystem decay asymmetry; x3 is the least stable.
pub const DECAY_MULTIPLIERS: [f64; 3] = [1.0, 1.2, 1.5];

/// `[dx1/dt, dx2/dt, dx3/dt, d(dwelling)/dt]` at `(y, t)`.
///
/// The state is clamped into [0, 1] first; the returned derivative is not
/// clamped. Nudges add `NUDGE_GAIN * (1 - x_i)` on top of the base
/// derivative while their window is open. Non-finite inputs propagate.
pub fn derivative(y: &[f64; STATE_DIM], t: f64, params: &ParameterSet) -> [f64; STATE_DIM] {
    let s = StateVector::from(*y).clamped();
    let coherence = s.coherence();

    let d_dwelling = params.dwelling_rise * (1.0 - coherence) * (1.0 - s.dwelling)
        - params.dwelling_fade * coherence * s.dwelling;

    // High dwelling tightens coupling and relaxes decay.
    let coupling = 1.0 + params.coupling_boost * s.dwelling;
    let decay = params.base_decay * (1.0 - params.decay_relief * s.dwelling);

    let act = Activation::default();
    let (a1, a2, a3) = (act.apply(s.x1), act.apply(s.x2), act.apply(s.x3));

    let mut dx1 = coupling * (a2 + a3) / 2.0 * (1.0 - s.x1) - decay * s.x1 * DECAY_MULTIPLIERS[0];
    let mut dx2 = coupling * (a1 + a3) / 2.0 * (1.0 - s.x2) - decay * s.x2 * DECAY_MULTIPLIERS[1];
    let dx3 = coupling * (a1 + a2) / 2.0 * (1.0 - s.x3) - decay * s.x3 * DECAY_MULTIPLIERS[2];

    if params.first_nudge_active(t) {
        dx1 += NUDGE_GAIN * (1.0 - s.x1);
    }
    if params.second_nudge_active(t) {
        dx2 += NUDGE_GAIN * (1.0 - s.x2);
    }

    [dx1, dx2, dx3, d_dwelling]
}

/// The triadic model bound to one parameter set, ready to hand to an
/// integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriadicSystem {
    pub params: ParameterSet,
}

impl TriadicSystem {
    pub const fn new(params: ParameterSet) -> Self {
        Self { params }
    }
}

impl OdeSystem<STATE_DIM> for TriadicSystem {
    fn derivative(&self, y: &[f64; STATE_DIM], t: f64) -> [f64; STATE_DIM] {
        derivative(y, t, &self.params)
    }
}
