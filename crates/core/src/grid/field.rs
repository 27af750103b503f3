//! Gridded scalar fields on (time, level, latitude, longitude)
//!
//! [`ScalarField`] is the seam between the integrator and whatever holds the
//! reanalysis data. The integrator only ever reads: it asks for an exact time
//! slice, the coordinate axes, and node values. [`GriddedField`] is the
//! in-memory implementation used by the CLI and the tests; it can be loaded
//! from and saved to JSON.

use crate::core_types::parcel::Timestamp;
use crate::error::{Axis, FieldError};
use crate::grid::axis::FieldAxis;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Read-only gridded scalar field
///
/// Implementations must be shareable across threads; independent trajectories
/// sample the same fields concurrently.
pub trait ScalarField: Send + Sync {
    /// Variable name used in error messages (e.g. "u", "w", "t")
    fn name(&self) -> &str;

    /// Index of an exact timestamp on the time axis
    fn time_index(&self, time: Timestamp) -> Option<usize>;

    /// Longitude axis (degrees east)
    fn longitude(&self) -> &FieldAxis;

    /// Latitude axis (degrees north)
    fn latitude(&self) -> &FieldAxis;

    /// Pressure level axis (hPa)
    fn level(&self) -> &FieldAxis;

    /// Value at a grid node
    ///
    /// Indices are guaranteed to be in range by the caller.
    fn value_at(&self, time: usize, lon: usize, lat: usize, level: usize) -> f64;
}

/// On-disk layout of a [`GriddedField`]
///
/// `values` is row-major over `[time][level][latitude][longitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GriddedFieldFile {
    name: String,
    times: Vec<Timestamp>,
    longitude: Vec<f64>,
    latitude: Vec<f64>,
    level: Vec<f64>,
    values: Vec<f64>,
}

/// In-memory gridded field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GriddedFieldFile", into = "GriddedFieldFile")]
pub struct GriddedField {
    name: String,
    times: Vec<Timestamp>,
    time_lookup: FxHashMap<Timestamp, usize>,
    longitude: FieldAxis,
    latitude: FieldAxis,
    level: FieldAxis,
    /// Stored as flattened 4D array:
    /// index = ((it * nlev + ik) * nlat + ij) * nlon + ii
    values: Vec<f64>,
}

impl GriddedField {
    /// Build a field from axes and a row-major value buffer
    ///
    /// # Errors
    /// Returns error if an axis is empty or not strictly monotonic, a time is
    /// repeated, or `values` does not match the grid shape
    pub fn new(
        name: impl Into<String>,
        times: Vec<Timestamp>,
        longitude: Vec<f64>,
        latitude: Vec<f64>,
        level: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, FieldError> {
        if times.is_empty() {
            return Err(FieldError::EmptyAxis { axis: Axis::Time });
        }
        let mut time_lookup = FxHashMap::default();
        for (i, t) in times.iter().enumerate() {
            if time_lookup.insert(*t, i).is_some() {
                return Err(FieldError::DuplicateTime { time: *t });
            }
        }

        let longitude = FieldAxis::new(Axis::Longitude, longitude)?;
        let latitude = FieldAxis::new(Axis::Latitude, latitude)?;
        let level = FieldAxis::new(Axis::Level, level)?;

        let expected = times.len() * level.len() * latitude.len() * longitude.len();
        if values.len() != expected {
            return Err(FieldError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            times,
            time_lookup,
            longitude,
            latitude,
            level,
            values,
        })
    }

    /// Build a field by evaluating `f(time, lon, lat, level)` at every node
    ///
    /// # Errors
    /// Same validation as [`GriddedField::new`]
    pub fn from_fn<F>(
        name: impl Into<String>,
        times: Vec<Timestamp>,
        longitude: Vec<f64>,
        latitude: Vec<f64>,
        level: Vec<f64>,
        f: F,
    ) -> Result<Self, FieldError>
    where
        F: Fn(Timestamp, f64, f64, f64) -> f64,
    {
        let mut values =
            Vec::with_capacity(times.len() * level.len() * latitude.len() * longitude.len());
        for &t in &times {
            for &p in &level {
                for &lat in &latitude {
                    for &lon in &longitude {
                        values.push(f(t, lon, lat, p));
                    }
                }
            }
        }
        Self::new(name, times, longitude, latitude, level, values)
    }

    /// Build a field holding the same value at every node
    ///
    /// # Errors
    /// Same validation as [`GriddedField::new`]
    pub fn constant(
        name: impl Into<String>,
        times: Vec<Timestamp>,
        longitude: Vec<f64>,
        latitude: Vec<f64>,
        level: Vec<f64>,
        value: f64,
    ) -> Result<Self, FieldError> {
        Self::from_fn(name, times, longitude, latitude, level, |_, _, _, _| value)
    }

    /// Load a field from a JSON file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FieldError> {
        let contents = fs::read_to_string(path)?;
        let field: Self = serde_json::from_str(&contents)?;
        Ok(field)
    }

    /// Save the field as JSON
    ///
    /// # Errors
    /// Returns error if the field cannot be serialized or written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FieldError> {
        let contents = serde_json::to_string(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Time axis in native order
    #[must_use]
    pub fn times(&self) -> &[Timestamp] {
        &self.times
    }

    /// Grid shape as `(time, level, latitude, longitude)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (
            self.times.len(),
            self.level.len(),
            self.latitude.len(),
            self.longitude.len(),
        )
    }

    #[inline]
    fn index(&self, time: usize, lon: usize, lat: usize, level: usize) -> usize {
        ((time * self.level.len() + level) * self.latitude.len() + lat) * self.longitude.len() + lon
    }
}

impl ScalarField for GriddedField {
    fn name(&self) -> &str {
        &self.name
    }

    fn time_index(&self, time: Timestamp) -> Option<usize> {
        self.time_lookup.get(&time).copied()
    }

    fn longitude(&self) -> &FieldAxis {
        &self.longitude
    }

    fn latitude(&self) -> &FieldAxis {
        &self.latitude
    }

    fn level(&self) -> &FieldAxis {
        &self.level
    }

    #[inline]
    fn value_at(&self, time: usize, lon: usize, lat: usize, level: usize) -> f64 {
        self.values[self.index(time, lon, lat, level)]
    }
}

impl TryFrom<GriddedFieldFile> for GriddedField {
    type Error = FieldError;

    fn try_from(file: GriddedFieldFile) -> Result<Self, Self::Error> {
        GriddedField::new(
            file.name,
            file.times,
            file.longitude,
            file.latitude,
            file.level,
            file.values,
        )
    }
}

impl From<GriddedField> for GriddedFieldFile {
    fn from(field: GriddedField) -> Self {
        GriddedFieldFile {
            name: field.name,
            times: field.times,
            longitude: field.longitude.values().to_vec(),
            latitude: field.latitude.values().to_vec(),
            level: field.level.values().to_vec(),
            values: field.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn times() -> Vec<Timestamp> {
        let t0 = Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap();
        vec![t0, t0 - TimeDelta::hours(6)]
    }

    fn small_field() -> GriddedField {
        GriddedField::from_fn(
            "t",
            times(),
            vec![0.0, 10.0, 20.0],
            vec![10.0, 0.0],
            vec![500.0, 850.0],
            |_, lon, lat, lev| lon + 100.0 * lat + 1000.0 * lev,
        )
        .unwrap()
    }

    #[test]
    fn test_node_values_follow_layout() {
        let f = small_field();
        assert_eq!(f.shape(), (2, 2, 2, 3));
        assert_eq!(f.value_at(0, 2, 0, 1), 20.0 + 1000.0 + 850_000.0);
        assert_eq!(f.value_at(1, 1, 1, 0), 10.0 + 0.0 + 500_000.0);
    }

    #[test]
    fn test_time_lookup_is_exact() {
        let f = small_field();
        let ts = times();
        assert_eq!(f.time_index(ts[1]), Some(1));
        assert_eq!(f.time_index(ts[0] + TimeDelta::minutes(1)), None);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = GriddedField::new("u", times(), vec![0.0, 1.0], vec![0.0], vec![500.0], vec![0.0; 3])
            .unwrap_err();
        assert!(matches!(
            err,
            FieldError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_duplicate_time_rejected() {
        let t = times()[0];
        let err = GriddedField::constant("u", vec![t, t], vec![0.0], vec![0.0], vec![500.0], 1.0)
            .unwrap_err();
        assert!(matches!(err, FieldError::DuplicateTime { .. }));
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let f = small_field();
        let json = serde_json::to_string(&f).unwrap();
        let back: GriddedField = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shape(), f.shape());
        assert_eq!(back.value_at(1, 2, 1, 1), f.value_at(1, 2, 1, 1));
        assert_eq!(back.latitude().values(), f.latitude().values());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let json = r#"{"name":"u","times":[],"longitude":[0.0],"latitude":[0.0],"level":[500.0],"values":[]}"#;
        assert!(serde_json::from_str::<GriddedField>(json).is_err());
    }
}
