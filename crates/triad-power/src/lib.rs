#![forbid(unsafe_code)]

pub mod curve;
pub mod scenario;

pub use curve::{
    instantaneous_power, power_curve, power_curve_for_tag, quantum_factor, rated_power,
    PowerCurve, BASE_DENSITY, REACTOR_VOLUME, SYNERGY_GAIN,
};
pub use scenario::PowerScenario;
