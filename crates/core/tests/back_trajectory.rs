//! End-to-end back trajectories through synthetic global fields
//!
//! Fields sit on a 2.5° global grid (latitude stored north-to-south) with
//! pressure levels from 1000 to 100 hPa, the layout of common reanalysis
//! products.
//!
//! Run with `RUST_LOG=backtraj_core=debug` to see per-step logs.

use approx::assert_relative_eq;
use backtraj_core::core_types::units::{Kilometers, Radians};
use backtraj_core::physics::destination;
use backtraj_core::{
    back_trajectories, back_trajectory, backward_times, GriddedField, ReleasePoint, SampleError,
    Timestamp, TrajectoryConfig, TrajectoryEngine, TrajectoryError, EARTH_RADIUS_KM,
};
use chrono::{TimeDelta, TimeZone, Utc};
use std::f64::consts::PI;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const LEVELS: [f64; 7] = [1000.0, 850.0, 700.0, 500.0, 300.0, 200.0, 100.0];

fn release_time() -> Timestamp {
    Utc.with_ymd_and_hms(2017, 8, 25, 18, 0, 0).unwrap()
}

fn field<F>(name: &str, times: &[Timestamp], f: F) -> GriddedField
where
    F: Fn(Timestamp, f64, f64, f64) -> f64,
{
    let lon: Vec<f64> = (0..144).map(|i| f64::from(i) * 2.5).collect();
    let lat: Vec<f64> = (0..73).map(|j| 90.0 - f64::from(j) * 2.5).collect();
    GriddedField::from_fn(name, times.to_vec(), lon, lat, LEVELS.to_vec(), f).unwrap()
}

fn uniform(name: &str, times: &[Timestamp], value: f64) -> GriddedField {
    field(name, times, |_, _, _, _| value)
}

#[test]
fn test_westerly_wind_moves_parcel_west() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 2);
    let u = uniform("u", &times, 10.0);
    let v = uniform("v", &times, 0.0);
    let w = uniform("w", &times, 0.0);

    let traj = back_trajectory((30.0, 100.0), 500.0, &times, &u, &v, &w, None).unwrap();

    assert_eq!(traj.len(), 2);
    let (lon, lat) = destination(
        100.0,
        30.0,
        Radians::new(3.0 * PI / 2.0),
        Kilometers::new(216.0),
        EARTH_RADIUS_KM,
    );
    let end = traj.last().unwrap();
    assert_eq!(end.time, times[1]);
    assert_relative_eq!(end.longitude, lon, epsilon = 1e-9);
    assert_relative_eq!(end.latitude, lat, epsilon = 1e-9);
    assert_relative_eq!(end.level, 500.0, epsilon = 1e-12);
    assert!(end.longitude < 100.0);
    assert!(end.auxiliary.is_none());
}

#[test]
fn test_one_state_per_time_starting_at_release() {
    let times = backward_times(release_time(), TimeDelta::hours(3), 9);
    let u = field("u", &times, |_, _, lat, _| 15.0 * lat.to_radians().cos());
    let v = field("v", &times, |_, lon, _, _| 3.0 * lon.to_radians().sin());
    let w = uniform("w", &times, 0.02);

    let traj = back_trajectory((-20.0, 140.0), 250.0, &times, &u, &v, &w, None).unwrap();

    assert_eq!(traj.len(), times.len());
    let first = traj.first().unwrap();
    assert_eq!(first.time, times[0]);
    assert_eq!(first.latitude, -20.0);
    assert_eq!(first.longitude, 140.0);
    assert_eq!(first.level, 250.0);

    for (state, t) in traj.iter().zip(&times) {
        assert_eq!(state.time, *t);
        assert!((0.0..360.0).contains(&state.longitude));
        assert!((-90.0..=90.0).contains(&state.latitude));
    }
    // Positive omega adds omega·36·dt to the level at every step
    let end = traj.last().unwrap();
    assert!(end.level > 250.0);
    assert_relative_eq!(end.level, 250.0 + 8.0 * 0.02 * 36.0 * 3.0, epsilon = 1e-9);
    assert_relative_eq!(traj.duration().value(), 24.0, epsilon = 1e-12);
}

#[test]
fn test_requested_order_is_kept() {
    let t0 = release_time();
    let times = vec![t0, t0 - TimeDelta::hours(6), t0 - TimeDelta::hours(3)];
    let u = uniform("u", &times, 5.0);
    let v = uniform("v", &times, 5.0);
    let w = uniform("w", &times, 0.0);

    let traj = back_trajectory((0.0, 180.0), 850.0, &times, &u, &v, &w, None).unwrap();
    let got: Vec<_> = traj.iter().map(|s| s.time).collect();
    assert_eq!(got, times);
}

#[test]
fn test_too_few_times() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 2);
    let u = uniform("u", &times, 1.0);
    for n in [0, 1] {
        let err = back_trajectory((0.0, 0.0), 500.0, &times[..n], &u, &u, &u, None).unwrap_err();
        assert_eq!(err, TrajectoryError::InsufficientTimes { count: n });
    }
}

#[test]
fn test_temperature_annotation_at_every_point() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 5);
    let u = uniform("u", &times, -8.0);
    let v = uniform("v", &times, 4.0);
    let w = uniform("w", &times, -0.05);
    let temperature = |lat: f64, level: f64| 250.0 + 0.3 * lat + 0.04 * level;
    let t = field("t", &times, |_, _, lat, level| temperature(lat, level));

    let traj = back_trajectory((45.0, 10.0), 250.0, &times, &u, &v, &w, Some(&t)).unwrap();

    assert_eq!(traj.len(), 5);
    for state in &traj {
        let value = state.auxiliary.unwrap();
        assert_relative_eq!(value, temperature(state.latitude, state.level), epsilon = 1e-9);
    }

    // Annotation never changes the path
    let bare = back_trajectory((45.0, 10.0), 250.0, &times, &u, &v, &w, None).unwrap();
    for (a, b) in traj.iter().zip(&bare) {
        assert_eq!((a.longitude, a.latitude, a.level), (b.longitude, b.latitude, b.level));
    }
}

#[test]
fn test_leaving_the_grid_aborts_with_failing_pair() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 5);
    let u = uniform("u", &times, 0.0);
    let v = uniform("v", &times, 0.0);
    // omega·36·dt = -10.8 hPa per step, past the 100 hPa top level during the
    // third step
    let w = uniform("w", &times, -0.05);

    let err = back_trajectory((10.0, 60.0), 130.0, &times, &u, &v, &w, None).unwrap_err();

    assert_eq!(err.failing_pair(), Some((times[2], times[3])));
    assert!(matches!(
        err.sample_error(),
        Some(SampleError::OutOfDomain { axis: backtraj_core::Axis::Level, .. })
    ));
}

#[test]
fn test_wind_times_must_match_exactly() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 3);
    let u = uniform("u", &times, 1.0);
    let v = uniform("v", &times, 1.0);
    let w = uniform("w", &times, 0.0);

    let shifted: Vec<_> = times.iter().map(|t| *t + TimeDelta::minutes(30)).collect();
    let err = back_trajectory((0.0, 0.0), 500.0, &shifted, &u, &v, &w, None).unwrap_err();
    assert_eq!(err.failing_pair(), Some((shifted[0], shifted[1])));
    assert!(matches!(err.sample_error(), Some(SampleError::TimeNotFound { .. })));
}

#[test]
fn test_crossing_the_prime_meridian() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 4);
    // Easterly wind: the back trajectory heads east across 0°
    let u = uniform("u", &times, -20.0);
    let v = uniform("v", &times, 0.0);
    let w = uniform("w", &times, 0.0);

    let traj = back_trajectory((0.0, 353.0), 500.0, &times, &u, &v, &w, None).unwrap();
    let end = traj.last().unwrap();
    assert!(end.longitude < 20.0, "expected wrap past 0°, got {}", end.longitude);
    assert!(traj.total_distance(EARTH_RADIUS_KM).value() > 1200.0);
}

#[test]
fn test_custom_radius_scales_displacement() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 2);
    let u = uniform("u", &times, 0.0);
    let v = uniform("v", &times, 10.0);
    let w = uniform("w", &times, 0.0);

    let config = TrajectoryConfig {
        earth_radius_km: 2.0 * EARTH_RADIUS_KM,
        ..TrajectoryConfig::default()
    };
    let small = TrajectoryEngine::new(&u, &v, &w).run(0.0, 90.0, 500.0, &times).unwrap();
    let large = TrajectoryEngine::new(&u, &v, &w)
        .with_config(config)
        .run(0.0, 90.0, 500.0, &times)
        .unwrap();

    let dlat_small = small.last().unwrap().latitude;
    let dlat_large = large.last().unwrap().latitude;
    assert!(dlat_small < 0.0);
    assert_relative_eq!(dlat_small, 2.0 * dlat_large, epsilon = 1e-9);
}

#[test]
fn test_batch_keeps_release_order() {
    let times = backward_times(release_time(), TimeDelta::hours(6), 4);
    let u = field("u", &times, |_, _, lat, _| -10.0 - 0.1 * lat);
    let v = uniform("v", &times, -3.0);
    let w = uniform("w", &times, 0.0);
    let engine = TrajectoryEngine::new(&u, &v, &w);

    let releases: Vec<_> = (0..16)
        .map(|i| ReleasePoint::new(-60.0 + 8.0 * f64::from(i), 20.0 * f64::from(i), 500.0))
        .collect();
    let results = back_trajectories(&engine, &releases, &times);

    assert_eq!(results.len(), releases.len());
    for (release, result) in releases.iter().zip(&results) {
        let traj = result.as_ref().unwrap();
        let first = traj.first().unwrap();
        assert_eq!(first.latitude, release.latitude);
        assert_eq!(first.longitude, release.longitude);
    }
}
