#![forbid(unsafe_code)]

pub mod dopri;
pub mod error;
pub mod integrator;
pub mod rk4;
#[cfg(test)]
mod tests;

pub use dopri::DormandPrince;
pub use error::IntegrationError;
pub use integrator::Integrator;
pub use rk4::Rk4;

use serde::{Deserialize, Serialize};
use triad_core::{OdeSystem, TimeGrid};

/// Integrator selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum IntegratorChoice {
    Rk4(Rk4),
    Dopri5(DormandPrince),
}

impl Default for IntegratorChoice {
    fn default() -> Self {
        Self::Dopri5(DormandPrince::default())
    }
}

impl IntegratorChoice {
    /// Default-configured integrator by name (`rk4` or `dopri5`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rk4" => Some(Self::Rk4(Rk4::default())),
            "dopri5" => Some(Self::Dopri5(DormandPrince::default())),
            _ => None,
        }
    }
}

impl Integrator for IntegratorChoice {
    fn name(&self) -> &'static str {
        match self {
            Self::Rk4(inner) => inner.name(),
            Self::Dopri5(inner) => inner.name(),
        }
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
        match self {
            Self::Rk4(inner) => inner.solve(system, y0, grid),
            Self::Dopri5(inner) => inner.solve(system, y0, grid),
        }
    }
}
