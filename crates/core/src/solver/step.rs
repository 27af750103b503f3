//! Heun predictor-corrector stepping of an air parcel
//!
//! One step moves a parcel across the interval `[t1, t]` (with `t1 < t` for a
//! back trajectory):
//!
//! ```text
//! predictor:  V₀ = V(t,  x₀)         x₁ = x₀ + E(V₀, Δt)
//! corrector:  V₁ = V(t1, x₁)         x₂ = x₀ + E(V₁, Δt)
//! result:     x  = (x₁ + x₂) / 2
//! ```
//!
//! where `E` is a single Euler displacement on the sphere. Both phases advect
//! from the original position `x₀`; only the wind differs. When both phases see
//! the same wind the scheme collapses to plain Euler.
//!
//! # Units
//! - u, v in m/s → km/h (× 3.6)
//! - omega in Pa/s → hPa/h (× 36)
//! - Δt in hours, horizontal distance in km

use crate::config::TrajectoryConfig;
use crate::core_types::parcel::Timestamp;
use crate::core_types::units::{Hectopascals, Hours, MetersPerSecond, PascalsPerSecond, Radians};
use crate::core_types::vec3::WindVector;
use crate::error::SampleError;
use crate::grid::field::ScalarField;
use crate::grid::sampler::FieldSampler;
use crate::physics::geodesic::destination;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;

/// Direction of time integration for a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Trace where the parcel came from (`t1 < t`)
    Backward,
    /// Trace where the parcel goes
    Forward,
}

impl Direction {
    /// Heading offset added to the wind direction
    #[inline]
    fn heading_offset(self) -> f64 {
        match self {
            Direction::Backward => PI,
            Direction::Forward => 0.0,
        }
    }

    /// Sign applied to the vertical displacement
    ///
    /// A backward step applies `ω·36·Δt` as-is; forward steps mirror it.
    #[inline]
    fn vertical_sign(self) -> f64 {
        match self {
            Direction::Backward => 1.0,
            Direction::Forward => -1.0,
        }
    }
}

/// Parcel position: longitude/latitude in degrees, level in hPa
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Degrees east (not necessarily wrapped)
    pub longitude: f64,
    /// Degrees north
    pub latitude: f64,
    /// Pressure level (hPa)
    pub level: f64,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64, level: f64) -> Self {
        Self {
            longitude,
            latitude,
            level,
        }
    }

    /// Per-axis arithmetic mean of two positions
    #[must_use]
    pub fn midpoint(&self, other: &Position) -> Position {
        Position {
            longitude: (self.longitude + other.longitude) / 2.0,
            latitude: (self.latitude + other.latitude) / 2.0,
            level: (self.level + other.level) / 2.0,
        }
    }
}

/// Compass heading (0 = north, π/2 = east) of the horizontal wind
///
/// `atan2(v, u)` is the mathematical angle counter-clockwise from east;
/// subtracting it from π/2 turns it into a clockwise-from-north heading.
#[inline]
#[must_use]
pub fn wind_heading(u: f64, v: f64, direction: Direction) -> Radians {
    Radians::new(FRAC_PI_2 - v.atan2(u) + direction.heading_offset())
}

/// Single Euler displacement from `from` under a constant wind over `dt`
///
/// `wind` is `(u m/s, v m/s, omega Pa/s)` and the level moves by
/// `omega·36·dt` hPa. For a backward step the heading is reversed; a forward
/// step keeps the heading and mirrors the vertical displacement, so stepping
/// backward under `wind` equals stepping forward under `-wind`.
#[must_use]
pub fn euler_step(
    wind: &WindVector,
    from: Position,
    dt: Hours,
    direction: Direction,
    earth_radius_km: f64,
) -> Position {
    let (u, v, omega) = (wind.x, wind.y, wind.z);

    let dlev: Hectopascals = PascalsPerSecond::new(omega).to_hpa_per_hour() * dt;
    let heading = wind_heading(u, v, direction);
    let speed = MetersPerSecond::new(u.hypot(v));
    let distance = speed.to_kmh() * dt;

    let (longitude, latitude) =
        destination(from.longitude, from.latitude, heading, distance, earth_radius_km);

    Position {
        longitude,
        latitude,
        level: from.level + direction.vertical_sign() * *dlev,
    }
}

/// Advances parcels one interval at a time by sampling u, v and omega fields
#[derive(Debug, Clone, Copy, Default)]
pub struct StepIntegrator {
    sampler: FieldSampler,
}

impl StepIntegrator {
    /// Create an integrator with the given configuration
    #[must_use]
    pub fn new(config: TrajectoryConfig) -> Self {
        Self {
            sampler: FieldSampler::new(config),
        }
    }

    /// The sampler used for wind lookups
    #[must_use]
    pub fn sampler(&self) -> &FieldSampler {
        &self.sampler
    }

    #[inline]
    fn earth_radius_km(&self) -> f64 {
        self.sampler.config().earth_radius_km
    }

    /// Single-phase step: sample the wind at `(t, from)` and advect over `dt`
    ///
    /// # Errors
    /// Any sampling failure, unchanged
    pub fn step(
        &self,
        u: &dyn ScalarField,
        v: &dyn ScalarField,
        w: &dyn ScalarField,
        t: Timestamp,
        from: Position,
        dt: Hours,
        direction: Direction,
    ) -> Result<Position, SampleError> {
        let wind = self
            .sampler
            .sample_wind(u, v, w, t, from.longitude, from.latitude, from.level)?;
        Ok(euler_step(&wind, from, dt, direction, self.earth_radius_km()))
    }

    /// Backward Heun step from `start` at time `t` to time `t1`
    ///
    /// Issues up to six field samples (u, v, omega per phase). The step is
    /// atomic: on error nothing is returned.
    ///
    /// # Errors
    /// The first sampling failure, unchanged
    pub fn predict_correct(
        &self,
        u: &dyn ScalarField,
        v: &dyn ScalarField,
        w: &dyn ScalarField,
        t: Timestamp,
        t1: Timestamp,
        start: Position,
    ) -> Result<Position, SampleError> {
        let dt = Hours::from_duration(t - t1);
        let radius = self.earth_radius_km();

        let predictor_wind =
            self.sampler
                .sample_wind(u, v, w, t, start.longitude, start.latitude, start.level)?;
        let predicted = euler_step(&predictor_wind, start, dt, Direction::Backward, radius);

        let corrector_wind = self.sampler.sample_wind(
            u,
            v,
            w,
            t1,
            predicted.longitude,
            predicted.latitude,
            predicted.level,
        )?;
        let corrected = euler_step(&corrector_wind, start, dt, Direction::Backward, radius);

        let averaged = predicted.midpoint(&corrected);
        debug!(
            "step {} -> {} ({}): ({:.3}, {:.3}, {:.1}) -> ({:.3}, {:.3}, {:.1})",
            t,
            t1,
            dt,
            start.longitude,
            start.latitude,
            start.level,
            averaged.longitude,
            averaged.latitude,
            averaged.level
        );
        Ok(averaged)
    }
}
