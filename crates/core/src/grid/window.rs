//! Per-query sampling windows
//!
//! Interpolating a global field at one point only needs the handful of nodes
//! around it. Each query builds a box of ±5° longitude/latitude and ±100 hPa,
//! clamped to the physical domain, and the sampler restricts the field to that
//! box before interpolating. The window never outlives the query.

use crate::config::TrajectoryConfig;
use crate::error::Axis;
use crate::grid::axis::AxisOrder;

/// Closed coordinate interval `[lo, hi]` with `lo <= hi` for a sane query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower bound
    pub lo: f64,
    /// Upper bound
    pub hi: f64,
}

impl Band {
    /// Band of `half_width` around `center`, clamped to `[min, max]`
    #[must_use]
    pub fn around(center: f64, half_width: f64, min: f64, max: f64) -> Self {
        Self {
            lo: (center - half_width).max(min),
            hi: (center + half_width).min(max),
        }
    }

    /// Slice bounds `(start, stop)` for an axis with the given direction
    ///
    /// Descending axes are sliced high-to-low.
    #[must_use]
    pub fn slice_bounds(&self, order: AxisOrder) -> (f64, f64) {
        match order {
            AxisOrder::Ascending => (self.lo, self.hi),
            AxisOrder::Descending => (self.hi, self.lo),
        }
    }

    /// True when `x` lies inside the closed band
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lo && x <= self.hi
    }
}

/// Longitude domain of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudeConvention {
    /// Degrees east in `[0, 360)`
    ZeroTo360,
    /// Degrees east in `[-180, 180)`
    Signed180,
}

impl LongitudeConvention {
    /// Convention implied by the smallest longitude on a field's axis
    #[must_use]
    pub fn from_axis_min(min: f64) -> Self {
        if min < 0.0 {
            LongitudeConvention::Signed180
        } else {
            LongitudeConvention::ZeroTo360
        }
    }

    /// Wrap a longitude into this convention
    #[must_use]
    pub fn wrap(self, lon: f64) -> f64 {
        let wrapped = crate::physics::geodesic::normalize_longitude(lon);
        match self {
            LongitudeConvention::ZeroTo360 => wrapped,
            LongitudeConvention::Signed180 if wrapped >= 180.0 => wrapped - 360.0,
            LongitudeConvention::Signed180 => wrapped,
        }
    }

    /// Clamp limits for a longitude band
    #[must_use]
    pub fn limits(self) -> (f64, f64) {
        match self {
            LongitudeConvention::ZeroTo360 => (0.0, 360.0),
            LongitudeConvention::Signed180 => (-180.0, 180.0),
        }
    }
}

/// Box of grid coordinates selected around one query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingWindow {
    /// Query longitude, wrapped into the field's convention
    pub lon_key: f64,
    /// Query latitude
    pub lat: f64,
    /// Query level (hPa)
    pub level: f64,
    /// Longitude band
    pub longitude: Band,
    /// Latitude band, clamped to `[-90, 90]`
    pub latitude: Band,
    /// Level band, clamped to `[min_level, ∞)`
    pub levels: Band,
}

impl SamplingWindow {
    /// Build the window for a query point
    ///
    /// The longitude is wrapped before the band is built, so any finite input
    /// (including values a step produced west of the prime meridian) lands on
    /// the field's axis.
    #[must_use]
    pub fn around(
        lon: f64,
        lat: f64,
        level: f64,
        convention: LongitudeConvention,
        config: &TrajectoryConfig,
    ) -> Self {
        let lon_key = convention.wrap(lon);
        let (lon_min, lon_max) = convention.limits();
        Self {
            lon_key,
            lat,
            level,
            longitude: Band::around(lon_key, config.lon_half_width, lon_min, lon_max),
            latitude: Band::around(lat, config.lat_half_width, -90.0, 90.0),
            levels: Band::around(level, config.level_half_depth, config.min_level, f64::INFINITY),
        }
    }

    /// First axis whose band does not hold the query coordinate
    ///
    /// Clamping can push a band past a query that lies outside the physical
    /// domain (a latitude beyond the pole, a level under `min_level`).
    #[must_use]
    pub fn outside_axis(&self) -> Option<Axis> {
        if !self.longitude.contains(self.lon_key) {
            Some(Axis::Longitude)
        } else if !self.latitude.contains(self.lat) {
            Some(Axis::Latitude)
        } else if !self.levels.contains(self.level) {
            Some(Axis::Level)
        } else {
            None
        }
    }
}
