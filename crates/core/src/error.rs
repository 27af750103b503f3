//! Error types for field sampling, trajectory integration and data loading

use crate::core_types::parcel::Timestamp;
use std::fmt;
use thiserror::Error;

/// Grid axis of a gridded field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Valid time
    Time,
    /// Longitude (degrees east)
    Longitude,
    /// Latitude (degrees north)
    Latitude,
    /// Pressure level (hPa)
    Level,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Time => "time",
            Axis::Longitude => "longitude",
            Axis::Latitude => "latitude",
            Axis::Level => "level",
        };
        f.write_str(name)
    }
}

/// Failure to obtain a field value at a query point
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// The requested time is not on the field's time axis
    #[error("time {time} is not on the time axis of field '{field}'")]
    TimeNotFound {
        /// Field name
        field: String,
        /// Requested time
        time: Timestamp,
    },

    /// The sampling window around the query point cannot be interpolated
    #[error(
        "sampling window of field '{field}' is degenerate on the {axis} axis at \
         ({longitude:.4}E, {latitude:.4}N, {level:.2} hPa)"
    )]
    OutOfDomain {
        /// Field name
        field: String,
        /// First axis on which the window failed
        axis: Axis,
        /// Query longitude (normalised)
        longitude: f64,
        /// Query latitude
        latitude: f64,
        /// Query level
        level: f64,
    },
}

/// Failure of a whole trajectory computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    /// Fewer than two timestamps were supplied
    #[error("a trajectory needs at least 2 times, got {count}")]
    InsufficientTimes {
        /// Number of timestamps supplied
        count: usize,
    },

    /// A field sample failed while stepping from `from` to `to`
    #[error("step {step} ({from} -> {to}) failed")]
    Sample {
        /// Zero-based index of the failing time pair
        step: usize,
        /// Start time of the failing pair
        from: Timestamp,
        /// End time of the failing pair
        to: Timestamp,
        /// Original sampling failure, unchanged
        #[source]
        source: SampleError,
    },

    /// Sampling the annotation field failed at an emitted state
    #[error("annotation at {time} failed")]
    Annotation {
        /// Time of the state being annotated
        time: Timestamp,
        /// Original sampling failure, unchanged
        #[source]
        source: SampleError,
    },
}

impl TrajectoryError {
    /// The underlying sampling failure, if this error came from a field sample
    #[must_use]
    pub fn sample_error(&self) -> Option<&SampleError> {
        match self {
            TrajectoryError::Sample { source, .. } | TrajectoryError::Annotation { source, .. } => {
                Some(source)
            }
            TrajectoryError::InsufficientTimes { .. } => None,
        }
    }

    /// The failing time pair, if this error came from a step
    #[must_use]
    pub fn failing_pair(&self) -> Option<(Timestamp, Timestamp)> {
        match self {
            TrajectoryError::Sample { from, to, .. } => Some((*from, *to)),
            TrajectoryError::InsufficientTimes { .. } | TrajectoryError::Annotation { .. } => None,
        }
    }
}

/// Failure to build or load a gridded field
#[derive(Debug, Error)]
pub enum FieldError {
    /// An axis has no coordinates
    #[error("{axis} axis is empty")]
    EmptyAxis {
        /// Offending axis
        axis: Axis,
    },

    /// An axis is not strictly monotonic or contains non-finite values
    #[error("{axis} axis must be finite and strictly monotonic")]
    NonMonotonicAxis {
        /// Offending axis
        axis: Axis,
    },

    /// The time axis repeats a timestamp
    #[error("time axis repeats {time}")]
    DuplicateTime {
        /// Repeated timestamp
        time: Timestamp,
    },

    /// The value buffer does not match the axis lengths
    #[error("expected {expected} values for the grid shape, got {actual}")]
    ShapeMismatch {
        /// time × level × latitude × longitude
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed field file
    #[error("failed to parse field file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to load or validate a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A parameter is outside its valid range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
