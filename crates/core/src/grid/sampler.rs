//! Windowed multilinear sampling of gridded fields
//!
//! A sample is taken in three stages:
//! 1. Exact time slice (no temporal interpolation; a missing time is fatal)
//! 2. Label-slice selection of the [`SamplingWindow`] on each spatial axis,
//!    honouring the axis direction
//! 3. Trilinear interpolation over (longitude, latitude, level) using only the
//!    nodes inside the window
//!
//! If any axis of the window selects no nodes, or the query falls outside the
//! span of the selected nodes, the sample fails with
//! [`SampleError::OutOfDomain`]. There is no fallback value.

use crate::config::TrajectoryConfig;
use crate::core_types::parcel::Timestamp;
use crate::core_types::vec3::WindVector;
use crate::error::{Axis, SampleError};
use crate::grid::axis::{FieldAxis, Stencil};
use crate::grid::field::ScalarField;
use crate::grid::window::{Band, LongitudeConvention, SamplingWindow};
use tracing::trace;

/// Samples scalar fields at arbitrary points
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSampler {
    config: TrajectoryConfig,
}

impl FieldSampler {
    /// Create a sampler with the given window configuration
    #[must_use]
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    /// Window configuration in use
    #[must_use]
    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// Field value at `(time, lon, lat, level)`
    ///
    /// # Errors
    /// `TimeNotFound` if `time` is not on the field's time axis;
    /// `OutOfDomain` if the window around the point cannot be interpolated
    pub fn sample(
        &self,
        field: &dyn ScalarField,
        time: Timestamp,
        lon: f64,
        lat: f64,
        level: f64,
    ) -> Result<f64, SampleError> {
        let it = field.time_index(time).ok_or_else(|| SampleError::TimeNotFound {
            field: field.name().to_string(),
            time,
        })?;

        let convention = LongitudeConvention::from_axis_min(field.longitude().min());
        let window = SamplingWindow::around(lon, lat, level, convention, &self.config);
        trace!(
            field = field.name(),
            lon = window.lon_key,
            lat,
            level,
            "sampling window {:?} x {:?} x {:?}",
            window.longitude,
            window.latitude,
            window.levels
        );

        let out_of_domain = |axis: Axis| SampleError::OutOfDomain {
            field: field.name().to_string(),
            axis,
            longitude: window.lon_key,
            latitude: lat,
            level,
        };

        if let Some(axis) = window.outside_axis() {
            return Err(out_of_domain(axis));
        }

        let sx = axis_stencil(field.longitude(), window.longitude, window.lon_key)
            .ok_or_else(|| out_of_domain(Axis::Longitude))?;
        let sy = axis_stencil(field.latitude(), window.latitude, lat)
            .ok_or_else(|| out_of_domain(Axis::Latitude))?;
        let sz = axis_stencil(field.level(), window.levels, level)
            .ok_or_else(|| out_of_domain(Axis::Level))?;

        let mut value = 0.0;
        for &(iz, wz) in &sz {
            for &(iy, wy) in &sy {
                for &(ix, wx) in &sx {
                    let w = wx * wy * wz;
                    // Zero-weight corners may sit on missing data
                    if w != 0.0 {
                        value += w * field.value_at(it, ix, iy, iz);
                    }
                }
            }
        }
        Ok(value)
    }

    /// Sample the three wind components at one point
    ///
    /// # Errors
    /// The first failing component's error, unchanged
    pub fn sample_wind(
        &self,
        u: &dyn ScalarField,
        v: &dyn ScalarField,
        w: &dyn ScalarField,
        time: Timestamp,
        lon: f64,
        lat: f64,
        level: f64,
    ) -> Result<WindVector, SampleError> {
        Ok(WindVector::new(
            self.sample(u, time, lon, lat, level)?,
            self.sample(v, time, lon, lat, level)?,
            self.sample(w, time, lon, lat, level)?,
        ))
    }
}

/// Select the window band on an axis and build the interpolation stencil
fn axis_stencil(axis: &FieldAxis, band: Band, x: f64) -> Option<Stencil> {
    let (start, stop) = band.slice_bounds(axis.order());
    let range = axis.select(start, stop)?;
    axis.stencil(&range, x)
}
