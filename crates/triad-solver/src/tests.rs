use crate::{DormandPrince, IntegrationError, Integrator, IntegratorChoice, Rk4};
use triad_core::{OdeSystem, ParameterSet, TimeGrid, TriadicSystem, INITIAL_STATE};

/// Scalar test equation `y' = f(y, t)`.
struct Scalar<F>(F);

impl<F> OdeSystem<1> for Scalar<F>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    fn derivative(&self, y: &[f64; 1], t: f64) -> [f64; 1] {
        [(self.0)(y[0], t)]
    }
}

fn scalar<F>(f: F) -> Scalar<F>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    Scalar(f)
}

fn decay_grid() -> TimeGrid {
    TimeGrid::linspace(0.0, 5.0, 51).unwrap()
}

fn canonical_system() -> TriadicSystem {
    TriadicSystem::new(
        ParameterSet::baseline()
            .with_nudge_time1(10.0)
            .with_nudge_time2(25.0),
    )
}

#[test]
fn rk4_tracks_exponential_decay() {
    let grid = decay_grid();
    let out = Rk4::default()
        .solve(&scalar(|y, _| -y), [1.0], &grid)
        .unwrap();
    assert_eq!(out.len(), grid.len());
    for (t, y) in grid.iter().zip(&out) {
        assert!((y[0] - (-t).exp()).abs() < 1e-8, "rk4 drift at t = {t}");
    }
}

#[test]
fn dopri_tracks_exponential_decay() {
    let grid = decay_grid();
    let out = DormandPrince::default()
        .solve(&scalar(|y, _| -y), [1.0], &grid)
        .unwrap();
    assert_eq!(out.len(), grid.len());
    for (t, y) in grid.iter().zip(&out) {
        assert!((y[0] - (-t).exp()).abs() < 1e-7, "dopri drift at t = {t}");
    }
}

#[test]
fn both_methods_follow_time_dependent_forcing() {
    let grid = TimeGrid::linspace(0.0, 10.0, 101).unwrap();
    let system = scalar(|_, t| t.cos());
    for choice in [
        IntegratorChoice::Rk4(Rk4::default()),
        IntegratorChoice::Dopri5(DormandPrince::default()),
    ] {
        let out = choice.solve(&system, [0.0], &grid).unwrap();
        for (t, y) in grid.iter().zip(&out) {
            assert!(
                (y[0] - t.sin()).abs() < 1e-7,
                "{} drift at t = {t}",
                choice.name()
            );
        }
    }
}

#[test]
fn first_sample_is_initial_state() {
    let grid = decay_grid();
    let system = scalar(|y, _| -2.0 * y);
    assert_eq!(Rk4::default().solve(&system, [0.7], &grid).unwrap()[0], [0.7]);
    assert_eq!(
        DormandPrince::default().solve(&system, [0.7], &grid).unwrap()[0],
        [0.7]
    );
}

#[test]
fn single_sample_grid_returns_initial_state_only() {
    let grid = TimeGrid::new(vec![3.0]).unwrap();
    let system = scalar(|y, _| y);
    let rk = Rk4::default().solve(&system, [2.0], &grid).unwrap();
    let dp = DormandPrince::default().solve(&system, [2.0], &grid).unwrap();
    assert_eq!(rk, vec![[2.0]]);
    assert_eq!(dp, vec![[2.0]]);
}

#[test]
fn dopri_lands_on_every_grid_time() {
    let grid = TimeGrid::new(vec![0.0, 0.3, 0.35, 2.0, 7.5, 7.500001, 9.0]).unwrap();
    let out = DormandPrince::default()
        .solve(&scalar(|_, _| 1.0), [0.0], &grid)
        .unwrap();
    assert_eq!(out.len(), grid.len());
    for (t, y) in grid.iter().zip(&out) {
        assert!((y[0] - t).abs() < 1e-12, "sample at t = {t} is {}", y[0]);
    }
}

#[test]
fn zero_substeps_is_rejected() {
    let err = Rk4::new(0)
        .solve(&scalar(|y, _| y), [1.0], &decay_grid())
        .unwrap_err();
    assert!(matches!(err, IntegrationError::InvalidConfig(_)));
}

#[test]
fn non_positive_tolerances_are_rejected() {
    let system = scalar(|y, _| y);
    for dp in [
        DormandPrince::with_tolerances(0.0, 1e-10),
        DormandPrince::with_tolerances(1e-8, -1.0),
        DormandPrince::with_tolerances(f64::NAN, 1e-10),
        DormandPrince {
            max_step: Some(0.0),
            ..DormandPrince::default()
        },
        DormandPrince {
            max_steps: 0,
            ..DormandPrince::default()
        },
    ] {
        let err = dp.solve(&system, [1.0], &decay_grid()).unwrap_err();
        assert!(matches!(err, IntegrationError::InvalidConfig(_)), "{dp:?}");
    }
}

#[test]
fn nan_derivative_is_reported() {
    let system = scalar(|_, _| f64::NAN);
    let rk = Rk4::default().solve(&system, [1.0], &decay_grid());
    assert!(matches!(rk, Err(IntegrationError::NonFiniteState { .. })));
    let dp = DormandPrince::default().solve(&system, [1.0], &decay_grid());
    assert!(matches!(dp, Err(IntegrationError::NonFiniteState { .. })));
}

#[test]
fn dopri_fails_on_finite_time_blow_up() {
    // y' = y^2 with y(0) = 1 escapes at t = 1.
    let grid = TimeGrid::linspace(0.0, 2.0, 21).unwrap();
    let dp = DormandPrince {
        max_steps: 10_000,
        ..DormandPrince::default()
    };
    assert!(dp.solve(&scalar(|y, _| y * y), [1.0], &grid).is_err());
}

#[test]
fn step_budget_is_enforced() {
    let dp = DormandPrince {
        max_steps: 3,
        ..DormandPrince::default()
    };
    let err = dp
        .integrate(&canonical_system(), INITIAL_STATE, &TimeGrid::canonical())
        .unwrap_err();
    assert!(matches!(err, IntegrationError::TooManySteps { max_steps: 3, .. }));
}

#[test]
fn methods_agree_on_the_triadic_system() {
    let grid = TimeGrid::canonical();
    let system = canonical_system();
    let rk = Rk4::default().integrate(&system, INITIAL_STATE, &grid).unwrap();
    let dp = DormandPrince::default()
        .integrate(&system, INITIAL_STATE, &grid)
        .unwrap();
    assert_eq!(rk.len(), grid.len());
    assert_eq!(dp.len(), grid.len());
    let (a, b) = (rk.last().unwrap(), dp.last().unwrap());
    for (x, y) in a.to_array().iter().zip(b.to_array()) {
        assert!((x - y).abs() < 1e-6, "final states differ: {a:?} vs {b:?}");
    }
}

#[test]
fn integrate_keeps_grid_times() {
    let grid = TimeGrid::linspace(0.0, 5.0, 11).unwrap();
    let traj = Rk4::new(4)
        .integrate(&canonical_system(), INITIAL_STATE, &grid)
        .unwrap();
    assert_eq!(traj.times(), grid.as_slice());
    assert_eq!(traj.states()[0], INITIAL_STATE);
}

#[test]
fn choice_deserializes_from_tagged_json() {
    let rk: IntegratorChoice =
        serde_json::from_str(r#"{"method":"rk4","substeps":4}"#).unwrap();
    assert_eq!(rk, IntegratorChoice::Rk4(Rk4::new(4)));

    let bare: IntegratorChoice = serde_json::from_str(r#"{"method":"rk4"}"#).unwrap();
    assert_eq!(bare, IntegratorChoice::Rk4(Rk4::default()));

    let dp: IntegratorChoice =
        serde_json::from_str(r#"{"method":"dopri5","rtol":1e-6}"#).unwrap();
    match dp {
        IntegratorChoice::Dopri5(inner) => {
            assert_eq!(inner.rtol, 1e-6);
            assert_eq!(inner.atol, DormandPrince::default().atol);
        }
        other => panic!("expected dopri5, got {other:?}"),
    }

    assert!(serde_json::from_str::<IntegratorChoice>(r#"{"method":"euler"}"#).is_err());
}

#[test]
fn choice_from_name() {
    assert_eq!(IntegratorChoice::from_name("rk4").map(|c| c.name()), Some("rk4"));
    assert_eq!(
        IntegratorChoice::from_name("dopri5").map(|c| c.name()),
        Some("dopri5")
    );
    assert!(IntegratorChoice::from_name("lsoda").is_none());
    assert_eq!(IntegratorChoice::default().name(), "dopri5");
}
