use crate::error::IntegrationError;
use crate::integrator::{all_finite, combine, Integrator};
use serde::{Deserialize, Serialize};
use triad_core::{OdeSystem, TimeGrid};

// Dormand-Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights, also the last stage row (FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth minus fourth order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;
const LANDING_FRACTION: f64 = 0.99;

/// Adaptive Dormand-Prince 5(4) with first-same-as-last stages.
///
/// Steps are shortened so every grid time is reached exactly; the solution
/// at grid samples is never interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DormandPrince {
    pub rtol: f64,
    pub atol: f64,
    pub initial_step: Option<f64>,
    pub max_step: Option<f64>,
    pub max_steps: usize,
}

impl Default for DormandPrince {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-10,
            initial_step: None,
            max_step: None,
            max_steps: 200_000,
        }
    }
}

struct StepOutcome<const N: usize> {
    y: [f64; N],
    k_last: [f64; N],
    error: f64,
}

impl DormandPrince {
    pub fn with_tolerances(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), IntegrationError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.rtol) || !positive(self.atol) {
            return Err(IntegrationError::InvalidConfig(format!(
                "dopri5 tolerances must be positive and finite (rtol = {}, atol = {})",
                self.rtol, self.atol
            )));
        }
        let bad_bound = |bound: Option<f64>| bound.is_some_and(|h| !positive(h));
        if bad_bound(self.initial_step) || bad_bound(self.max_step) {
            return Err(IntegrationError::InvalidConfig(
                "dopri5 step bounds must be positive and finite".into(),
            ));
        }
        if self.max_steps == 0 {
            return Err(IntegrationError::InvalidConfig(
                "dopri5 needs max_steps > 0".into(),
            ));
        }
        Ok(())
    }

    fn attempt<const N: usize, S>(
        &self,
        system: &S,
        t: f64,
        y: &[f64; N],
        k1: &[f64; N],
        h: f64,
    ) -> StepOutcome<N>
    where
        S: OdeSystem<N> + ?Sized,
    {
        let k2 = system.derivative(&combine(y, h, &[(A21, k1)]), t + C2 * h);
        let k3 = system.derivative(&combine(y, h, &[(A31, k1), (A32, &k2)]), t + C3 * h);
        let k4 = system.derivative(
            &combine(y, h, &[(A41, k1), (A42, &k2), (A43, &k3)]),
            t + C4 * h,
        );
        let k5 = system.derivative(
            &combine(y, h, &[(A51, k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
            t + C5 * h,
        );
        let k6 = system.derivative(
            &combine(y, h, &[(A61, k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)]),
            t + h,
        );
        let y_new = combine(y, h, &[(B1, k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)]);
        let k7 = system.derivative(&y_new, t + h);

        let err_vec = combine(
            &[0.0; N],
            h,
            &[(E1, k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
        );
        let error = self.error_norm(y, &y_new, &err_vec);

        StepOutcome {
            y: y_new,
            k_last: k7,
            error,
        }
    }

    /// RMS of the local error scaled by `atol + rtol * max(|y|, |y_new|)`.
    fn error_norm<const N: usize>(&self, y: &[f64; N], y_new: &[f64; N], err: &[f64; N]) -> f64 {
        if N == 0 {
            return 0.0;
        }
        let sum: f64 = (0..N)
            .map(|i| {
                let scale = self.atol + self.rtol * y[i].abs().max(y_new[i].abs());
                (err[i] / scale).powi(2)
            })
            .sum();
        (sum / N as f64).sqrt()
    }

    fn initial_step_for(&self, grid: &TimeGrid) -> f64 {
        let span = grid.end() - grid.start();
        let guess = self.initial_step.unwrap_or(span * 1e-3);
        match self.max_step {
            Some(max) => guess.min(max),
            None => guess,
        }
    }
}

impl Integrator for DormandPrince {
    fn name(&self) -> &'static str {
        "dopri5"
    }

    fn solve<const N: usize, S>(
        &self,
        system: &S,
        y0: [f64; N],
        grid: &TimeGrid,
    ) -> Result<Vec<[f64; N]>, IntegrationError>
    where
        S: OdeSystem<N> + ?Sized,
    {
        self.validate()?;
        let times = grid.as_slice();
        let mut out = Vec::with_capacity(times.len());
        out.push(y0);
        if times.len() == 1 {
            return Ok(out);
        }

        let mut t = times[0];
        let mut y = y0;
        let mut k1 = system.derivative(&y, t);
        if !all_finite(&y) || !all_finite(&k1) {
            return Err(IntegrationError::NonFiniteState { t });
        }

        let mut h = self.initial_step_for(grid);
        let (mut accepted, mut rejected) = (0usize, 0usize);

        for &target in &times[1..] {
            while t < target {
                if accepted + rejected >= self.max_steps {
                    return Err(IntegrationError::TooManySteps {
                        max_steps: self.max_steps,
                        t,
                    });
                }
                if let Some(max) = self.max_step {
                    h = h.min(max);
                }
                let remaining = target - t;
                // Stretch steps that would stop just short of the sample so
                // no sliver interval is left behind.
                let lands = h >= LANDING_FRACTION * remaining;
                let step = if lands { remaining } else { h };
                if step <= 16.0 * f64::EPSILON * t.abs().max(1.0) {
                    return Err(IntegrationError::StepSizeUnderflow { t, h: step });
                }

                let outcome = self.attempt(system, t, &y, &k1, step);
                let finite = all_finite(&outcome.y) && all_finite(&outcome.k_last);

                if finite && outcome.error <= 1.0 {
                    accepted += 1;
                    t = if lands { target } else { t + step };
                    y = outcome.y;
                    k1 = outcome.k_last;
                    let factor = if outcome.error == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * outcome.error.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    // A step cut short to land on the grid keeps the longer
                    // proposal for the next interval.
                    h = if lands { h.max(step * factor) } else { step * factor };
                } else {
                    rejected += 1;
                    let factor = if finite {
                        (SAFETY * outcome.error.powf(-0.2)).clamp(MIN_FACTOR, 1.0)
                    } else {
                        MIN_FACTOR
                    };
                    h = step * factor;
                    if !finite && h <= 16.0 * f64::EPSILON * t.abs().max(1.0) {
                        return Err(IntegrationError::NonFiniteState { t });
                    }
                }
            }
            out.push(y);
        }

        tracing::debug!(
            integrator = "dopri5",
            accepted,
            rejected,
            "solve finished"
        );
        Ok(out)
    }
}
