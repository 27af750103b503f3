//! Spherical-earth geometry

pub mod geodesic;

pub use geodesic::{destination, great_circle_distance, normalize_longitude, EARTH_RADIUS_KM};
