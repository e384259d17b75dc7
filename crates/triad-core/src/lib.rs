#![forbid(unsafe_code)]

pub mod activation;
pub mod dynamics;
pub mod error;
pub mod params;
pub mod state;
pub mod system;

pub use activation::{hill, Activation};
pub use dynamics::{derivative, TriadicSystem, DECAY_MULTIPLIERS};
pub use error::TriadError;
pub use params::{nudge_window_contains, ParameterSet, NUDGE_GAIN, NUDGE_WIDTH, REQUIRED_KEYS};
pub use state::{
    StateVector, TimeGrid, Trajectory, DEFAULT_HORIZON, DEFAULT_SAMPLES, INITIAL_STATE, STATE_DIM,
};
pub use system::OdeSystem;
