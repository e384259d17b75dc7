use crate::error::IntegrationError;
use triad_core::{OdeSystem, StateVector, TimeGrid, Trajectory, STATE_DIM};

/// A numerical integrator: derivative function, initial state and time grid
/// in, one state per grid sample out.
pub trait Integrator: Sync {
    fn name(&self) -> &'static str;

    /// Integrates `system` from `y0` at `grid.start()`. The first output is
    /// `y0`; output `i` is the state at `grid.as_slice()[i]`.
    fn solve<const N: usize, S>(
        &self,
        system: &S,
        y0: [f64; N],
        grid: &TimeGrid,
    ) -> Result<Vec<[f64; N]>, IntegrationError>
    where
        S: OdeSystem<N> + ?Sized;

    fn integrate<S>(
        &self,
        system: &S,
        initial: StateVector,
        grid: &TimeGrid,
    ) -> Result<Trajectory, IntegrationError>
    where
        S: OdeSystem<STATE_DIM> + ?Sized,
    {
        let samples = self.solve(system, initial.to_array(), grid)?;
        let states = samples.into_iter().map(StateVector::from).collect();
        Ok(Trajectory::new(grid, states)?)
    }
}

pub(crate) fn all_finite<const N: usize>(y: &[f64; N]) -> bool {
    y.iter().all(|v| v.is_finite())
}

/// `y + h * sum(coeff_j * k_j)`.
pub(crate) fn combine<const N: usize>(y: &[f64; N], h: f64, terms: &[(f64, &[f64; N])]) -> [f64; N] {
    std::array::from_fn(|i| {
        let slope: f64 = terms.iter().map(|(c, k)| c * k[i]).sum();
        y[i] + h * slope
    })
}
