use crate::driver::ScenarioKind;
use thiserror::Error;
use triad_core::TriadError;
use triad_solver::IntegrationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("scenario '{kind}' failed to integrate: {source}")]
    Integration {
        kind: ScenarioKind,
        #[source]
        source: IntegrationError,
    },
    #[error("scenario '{0}' produced an empty trajectory")]
    EmptyTrajectory(ScenarioKind),
    #[error(transparent)]
    Core(#[from] TriadError),
}
