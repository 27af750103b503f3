//! Many release points through the same fields
//!
//! Trajectories are independent: each one reads the shared fields and owns
//! its own state, so they run in parallel on the rayon pool. Results come back
//! in release-point order and one failure never affects the others.

use crate::core_types::parcel::{Timestamp, Trajectory};
use crate::error::TrajectoryError;
use crate::simulation::engine::TrajectoryEngine;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Where and at what level a parcel is released
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReleasePoint {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
    /// Pressure level (hPa)
    pub level: f64,
}

impl ReleasePoint {
    /// Create a release point
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, level: f64) -> Self {
        Self {
            latitude,
            longitude,
            level,
        }
    }
}

/// Run one back trajectory per release point over the same `times`
///
/// The returned vector is index-aligned with `releases`.
pub fn back_trajectories(
    engine: &TrajectoryEngine<'_>,
    releases: &[ReleasePoint],
    times: &[Timestamp],
) -> Vec<Result<Trajectory, TrajectoryError>> {
    info!(
        "Running {} back trajectories over {} times",
        releases.len(),
        times.len()
    );

    let results: Vec<_> = releases
        .par_iter()
        .map(|r| engine.run(r.latitude, r.longitude, r.level, times))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        "Batch complete: {} succeeded, {} failed",
        results.len() - failed,
        failed
    );
    results
}
