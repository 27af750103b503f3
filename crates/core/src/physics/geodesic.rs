//! Great-circle geometry on a spherical Earth
//!
//! The integrator treats the Earth as a sphere of radius 6378.1 km (the
//! equatorial radius); at trajectory step lengths of a few hundred kilometers
//! the ellipsoidal correction is far below the interpolation error of the
//! wind fields.
//!
//! # Direct problem
//!
//! Given an origin (φ₀, λ₀), an initial heading θ and an angular distance
//! δ = d / R:
//!
//! ```text
//! φ₁ = asin(sin φ₀ cos δ + cos φ₀ sin δ cos θ)
//! λ₁ = λ₀ + atan2(sin θ sin δ cos φ₀, cos δ − sin φ₀ sin φ₁)
//! ```
//!
//! θ is a compass heading: 0 = north, π/2 = east.

use crate::core_types::units::{Kilometers, Radians};

/// Mean equatorial Earth radius used by the integrator (km)
pub const EARTH_RADIUS_KM: f64 = 6378.1;

/// Destination point after travelling `distance_km` along a great circle
///
/// Inputs and outputs are in degrees. The returned longitude is continuous
/// with the origin (it may fall outside `[0, 360)`); normalising it is the
/// caller's job. Non-finite inputs propagate into the result unchecked.
///
/// # Arguments
///
/// * `origin_lon` - Origin longitude (degrees east)
/// * `origin_lat` - Origin latitude (degrees north)
/// * `heading` - Initial compass heading
/// * `distance_km` - Great-circle distance (km)
/// * `earth_radius_km` - Sphere radius (km)
#[must_use]
pub fn destination(
    origin_lon: f64,
    origin_lat: f64,
    heading: Radians,
    distance_km: Kilometers,
    earth_radius_km: f64,
) -> (f64, f64) {
    let lon0 = origin_lon.to_radians();
    let lat0 = origin_lat.to_radians();
    let delta = *distance_km / earth_radius_km;

    let lat1 = (lat0.sin() * delta.cos() + lat0.cos() * delta.sin() * heading.cos()).asin();
    let lon1 = lon0
        + (heading.sin() * delta.sin() * lat0.cos()).atan2(delta.cos() - lat0.sin() * lat1.sin());

    (lon1.to_degrees(), lat1.to_degrees())
}

/// Haversine great-circle distance between two points given in degrees
#[must_use]
pub fn great_circle_distance(
    lon1: f64,
    lat1: f64,
    lon2: f64,
    lat2: f64,
    earth_radius_km: f64,
) -> Kilometers {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    Kilometers::new(earth_radius_km * c)
}

/// Wrap a longitude into `[0, 360)`
#[inline]
#[must_use]
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = lon.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_zero_distance_returns_origin() {
        for i in 0..16 {
            let heading = Radians::new(f64::from(i) * PI / 8.0);
            let (lon, lat) = destination(123.4, -45.6, heading, Kilometers::new(0.0), EARTH_RADIUS_KM);
            assert_relative_eq!(lon, 123.4, epsilon = 1e-9);
            assert_relative_eq!(lat, -45.6, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_due_north_along_meridian() {
        // 1° of arc
        let d = Kilometers::new(EARTH_RADIUS_KM * 1.0_f64.to_radians());
        let (lon, lat) = destination(100.0, 30.0, Radians::new(0.0), d, EARTH_RADIUS_KM);
        assert_relative_eq!(lon, 100.0, epsilon = 1e-9);
        assert_relative_eq!(lat, 31.0, epsilon = 1e-9);
    }

    #[test]
    fn test_due_east_on_equator() {
        let d = Kilometers::new(EARTH_RADIUS_KM * 2.0_f64.to_radians());
        let (lon, lat) = destination(0.0, 0.0, Radians::new(FRAC_PI_2), d, EARTH_RADIUS_KM);
        assert_relative_eq!(lon, 2.0, epsilon = 1e-9);
        assert_relative_eq!(lat, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_longitude_is_not_normalized() {
        let d = Kilometers::new(EARTH_RADIUS_KM * 3.0_f64.to_radians());
        let (lon, _) = destination(1.0, 0.0, Radians::new(3.0 * FRAC_PI_2), d, EARTH_RADIUS_KM);
        assert_relative_eq!(lon, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nan_propagates() {
        let (lon, lat) = destination(
            f64::NAN,
            f64::NAN,
            Radians::new(0.0),
            Kilometers::new(10.0),
            EARTH_RADIUS_KM,
        );
        assert!(lon.is_nan());
        assert!(lat.is_nan());
    }

    #[test]
    fn test_distance_matches_destination() {
        let d = Kilometers::new(216.0);
        let (lon, lat) = destination(100.0, 30.0, Radians::new(1.0), d, EARTH_RADIUS_KM);
        let back = great_circle_distance(100.0, 30.0, lon, lat, EARTH_RADIUS_KM);
        assert_relative_eq!(*back, 216.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(-2.0), 358.0);
        assert_eq!(normalize_longitude(360.0), 0.0);
        assert_eq!(normalize_longitude(725.0), 5.0);
        assert_eq!(normalize_longitude(-1e-20), 0.0);
    }
}
