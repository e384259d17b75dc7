/// Right-hand side of an ODE with `N` states.
///
/// Integrators only see this trait. Implementations must be pure: the same
/// `(y, t)` always yields the same derivative, whatever order the solver
/// evaluates times in.
pub trait OdeSystem<const N: usize>: Sync {
    fn derivative(&self, y: &[f64; N], t: f64) -> [f64; N];
}
