use crate::error::IntegrationError;
use crate::integrator::{all_finite, combine, Integrator};
use serde::{Deserialize, Serialize};
use triad_core::{OdeSystem, TimeGrid};

pub const DEFAULT_SUBSTEPS: usize = 10;

/// Classic fourth-order Runge-Kutta with `substeps` equal steps per grid
/// interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rk4 {
    pub substeps: usize,
}

impl Default for Rk4 {
    fn default() -> Self {
        Self {
            substeps: DEFAULT_SUBSTEPS,
        }
    }
}

impl Rk4 {
    pub fn new(substeps: usize) -> Self {
        Self { substeps }
    }

    fn step<const N: usize, S>(system: &S, t: f64, y: &[f64; N], h: f64) -> [f64; N]
    where
        S: OdeSystem<N> + ?Sized,
    {
        let k1 = system.derivative(y, t);
        let k2 = system.derivative(&combine(y, h, &[(0.5, &k1)]), t + 0.5 * h);
        let k3 = system.derivative(&combine(y, h, &[(0.5, &k2)]), t + 0.5 * h);
        let k4 = system.derivative(&combine(y, h, &[(1.0, &k3)]), t + h);
        combine(
            y,
            h,
            &[(1.0 / 6.0, &k1), (1.0 / 3.0, &k2), (1.0 / 3.0, &k3), (1.0 / 6.0, &k4)],
        )
    }
}

impl Integrator for Rk4 {
    fn name(&self) -> &'static str {
        "rk4"
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
        if self.substeps == 0 {
            return Err(IntegrationError::InvalidConfig(
                "rk4 needs at least one substep per interval".into(),
            ));
        }
        let times = grid.as_slice();
        let mut out = Vec::with_capacity(times.len());
        let mut y = y0;
        out.push(y);

        for w in times.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            let h = (t1 - t0) / self.substeps as f64;
            for k in 0..self.substeps {
                y = Self::step(system, t0 + k as f64 * h, &y, h);
            }
            if !all_finite(&y) {
                return Err(IntegrationError::NonFiniteState { t: t1 });
            }
            out.push(y);
        }

        tracing::debug!(
            integrator = "rk4",
            intervals = times.len().saturating_sub(1),
            substeps = self.substeps,
            "solve finished"
        );
        Ok(out)
    }
}
