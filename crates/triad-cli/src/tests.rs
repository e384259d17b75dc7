use crate::cli;
use crate::profile::{parse_profile, Overrides, SimulationProfile};
use triad_core::{StateVector, INITIAL_STATE};
use triad_solver::{Integrator, IntegratorChoice, Rk4};

#[test]
fn empty_profile_resolves_to_canonical_run() {
    let (config, integrator) = SimulationProfile::default()
        .resolve(&Overrides::default())
        .unwrap();
    assert_eq!(config.grid.len(), 500);
    assert_eq!(config.grid.end(), 50.0);
    assert_eq!(config.initial_state, INITIAL_STATE);
    assert_eq!((config.schedule.phase_one, config.schedule.phase_two), (10.0, 25.0));
    assert_eq!(integrator.name(), "dopri5");
}

#[test]
fn profile_sections_are_applied() {
    let profile = parse_profile(
        r#"{
            "parameters": {
                "dwelling_rise": 0.3,
                "dwelling_fade": 0.5,
                "coupling_boost": 0.7,
                "decay_relief": 0.6,
                "base_decay": 0.2,
                "nudge_time1": 5.0
            },
            "initial_state": [0.1, 0.1, 0.1, 0.9],
            "horizon": {"end": 20.0, "samples": 201},
            "integrator": {"method": "rk4", "substeps": 5}
        }"#,
    )
    .unwrap();
    let (config, integrator) = profile.resolve(&Overrides::default()).unwrap();
    assert_eq!(config.baseline.dwelling_rise, 0.3);
    assert_eq!(config.initial_state, StateVector::new(0.1, 0.1, 0.1, 0.9));
    assert_eq!(config.grid.len(), 201);
    assert_eq!(config.grid.end(), 20.0);
    assert_eq!(config.schedule.phase_one, 5.0);
    assert_eq!(config.schedule.phase_two, 25.0);
    assert_eq!(integrator, IntegratorChoice::Rk4(Rk4::new(5)));
}

#[test]
fn flags_override_the_profile() {
    let profile = parse_profile(r#"{"horizon": {"end": 20.0}, "integrator": {"method": "rk4"}}"#).unwrap();
    let overrides = Overrides {
        integrator: IntegratorChoice::from_name("dopri5"),
        horizon_end: Some(30.0),
        samples: Some(61),
    };
    let (config, integrator) = profile.resolve(&overrides).unwrap();
    assert_eq!(config.grid.end(), 30.0);
    assert_eq!(config.grid.len(), 61);
    assert_eq!(integrator.name(), "dopri5");
}

#[test]
fn profile_missing_required_parameter_is_rejected() {
    let err = parse_profile(r#"{"parameters": {"dwelling_rise": 0.3}}"#).unwrap_err();
    assert!(format!("{err:#}").contains("missing required key"), "{err:#}");
}

#[test]
fn profile_unknown_section_is_rejected() {
    assert!(parse_profile(r#"{"scenario": "both"}"#).is_err());
}

#[test]
fn inverted_horizon_is_rejected() {
    let profile = parse_profile(r#"{"horizon": {"start": 10.0, "end": 5.0}}"#).unwrap();
    assert!(profile.resolve(&Overrides::default()).is_err());
}

#[test]
fn command_line_parses() {
    let matches = cli()
        .try_get_matches_from([
            "triad-sim",
            "--integrator",
            "rk4",
            "--samples",
            "100",
            "--format",
            "json",
            "--metrics",
        ])
        .unwrap();
    assert_eq!(matches.get_one::<String>("integrator").map(String::as_str), Some("rk4"));
    assert_eq!(matches.get_one::<usize>("samples").copied(), Some(100));
    assert!(matches.get_flag("metrics"));
    assert!(!matches.get_flag("verbose"));

    assert!(cli()
        .try_get_matches_from(["triad-sim", "--integrator", "euler"])
        .is_err());
}
