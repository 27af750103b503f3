//! Lagrangian Back-Trajectory Core Library
//!
//! Traces air parcels backward in time through gridded reanalysis winds.
//! Given a release point (latitude, longitude, pressure level) and a time
//! sequence running backward, the integrator returns where the parcel was at
//! each of those times.
//!
//! ## Pipeline
//!
//! - [`grid`]: gridded fields on (time, level, latitude, longitude) and
//!   windowed trilinear sampling
//! - [`physics`]: great-circle destination and distance on a spherical earth
//! - [`solver`]: Euler displacement and the predictor-corrector step
//! - [`simulation`]: full trajectories, optional annotation, parallel batches
//!
//! Wind components are u and v in m/s and omega in Pa/s. Levels are hPa and
//! decrease upward.

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{ParcelState, Timestamp, Trajectory, WindVector};

pub use config::TrajectoryConfig;
pub use error::{Axis, ConfigError, FieldError, SampleError, TrajectoryError};
pub use grid::{FieldSampler, GriddedField, ScalarField};
pub use physics::{great_circle_distance, EARTH_RADIUS_KM};
pub use simulation::{
    back_trajectories, back_trajectory, backward_times, ReleasePoint, TrajectoryEngine,
};
pub use solver::{Direction, Position, StepIntegrator};
