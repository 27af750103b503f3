//! Back-trajectory engine
//!
//! Walks a parcel backward through a time sequence one pair at a time:
//!
//! ```text
//! AT(times[0]) ──predict_correct──▶ AT(times[1]) ──▶ … ──▶ AT(times[n-1])
//! ```
//!
//! Each step starts from the averaged position the previous step produced;
//! there is no re-sampling at the averaged point. The optional annotation
//! field is sampled separately at every emitted state, including the release
//! point, and never influences the path.

use crate::config::TrajectoryConfig;
use crate::core_types::parcel::{ParcelState, Timestamp, Trajectory};
use crate::error::{SampleError, TrajectoryError};
use crate::grid::field::ScalarField;
use crate::grid::sampler::FieldSampler;
use crate::physics::geodesic::normalize_longitude;
use crate::solver::step::{Position, StepIntegrator};
use tracing::{debug, info, warn};

/// Samples a scalar field at emitted parcel states
#[derive(Clone, Copy)]
pub struct Annotator<'a> {
    field: &'a dyn ScalarField,
    sampler: FieldSampler,
}

impl<'a> Annotator<'a> {
    /// Create an annotator over `field`
    #[must_use]
    pub fn new(field: &'a dyn ScalarField, config: TrajectoryConfig) -> Self {
        Self {
            field,
            sampler: FieldSampler::new(config),
        }
    }

    /// Copy of `state` carrying the field value at its own time and position
    ///
    /// # Errors
    /// Any sampling failure, unchanged
    pub fn annotate(&self, state: ParcelState) -> Result<ParcelState, SampleError> {
        let value = self.sampler.sample(
            self.field,
            state.time,
            state.longitude,
            state.latitude,
            state.level,
        )?;
        Ok(state.with_auxiliary(value))
    }
}

/// Computes back trajectories through a set of u, v and omega fields
///
/// The engine borrows its fields; it never copies or mutates them, so one
/// engine can be shared across threads (see
/// [`back_trajectories`](crate::simulation::back_trajectories)).
#[derive(Clone, Copy)]
pub struct TrajectoryEngine<'a> {
    u: &'a dyn ScalarField,
    v: &'a dyn ScalarField,
    w: &'a dyn ScalarField,
    annotation: Option<&'a dyn ScalarField>,
    config: TrajectoryConfig,
}

impl<'a> TrajectoryEngine<'a> {
    /// Create an engine over zonal wind (m/s), meridional wind (m/s) and
    /// vertical motion (Pa/s) fields
    #[must_use]
    pub fn new(u: &'a dyn ScalarField, v: &'a dyn ScalarField, w: &'a dyn ScalarField) -> Self {
        Self {
            u,
            v,
            w,
            annotation: None,
            config: TrajectoryConfig::default(),
        }
    }

    /// Annotate every emitted state with a sample of `field`
    #[must_use]
    pub fn with_annotation(mut self, field: &'a dyn ScalarField) -> Self {
        self.annotation = Some(field);
        self
    }

    /// Use a non-default sampling/geodesic configuration
    #[must_use]
    pub fn with_config(mut self, config: TrajectoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    fn annotator(&self) -> Option<Annotator<'a>> {
        self.annotation.map(|field| Annotator::new(field, self.config))
    }

    /// Trace a parcel released at `(latitude, longitude, level)` at `times[0]`
    /// back through `times[1..]`
    ///
    /// `times` is consumed pairwise in the given order and is expected to run
    /// backward; it is never sorted. The result has exactly `times.len()`
    /// states in the same order.
    ///
    /// # Errors
    /// `InsufficientTimes` if fewer than two times are given; otherwise the
    /// first sampling failure wrapped with the failing time pair. No partial
    /// trajectory is returned.
    pub fn run(
        &self,
        latitude: f64,
        longitude: f64,
        level: f64,
        times: &[Timestamp],
    ) -> Result<Trajectory, TrajectoryError> {
        if times.len() < 2 {
            return Err(TrajectoryError::InsufficientTimes { count: times.len() });
        }

        info!(
            "Back trajectory from ({:.3}N, {:.3}E, {:.1} hPa) over {} times",
            latitude,
            longitude,
            level,
            times.len()
        );

        let integrator = StepIntegrator::new(self.config);
        let annotator = self.annotator();
        let emit = |state: ParcelState| -> Result<ParcelState, TrajectoryError> {
            match &annotator {
                Some(a) => a.annotate(state).map_err(|source| {
                    warn!("Annotation failed at {}: {}", state.time, source);
                    TrajectoryError::Annotation {
                        time: state.time,
                        source,
                    }
                }),
                None => Ok(state),
            }
        };

        let release = ParcelState::new(times[0], latitude, normalize_longitude(longitude), level);
        let mut states = Vec::with_capacity(times.len());
        states.push(emit(release)?);

        let start = Position::new(release.longitude, release.latitude, release.level);
        times
            .windows(2)
            .enumerate()
            .try_fold(start, |current, (step, pair)| {
                let (t, t1) = (pair[0], pair[1]);
                let next = integrator
                    .predict_correct(self.u, self.v, self.w, t, t1, current)
                    .map_err(|source| {
                        warn!("Step {} ({} -> {}) failed: {}", step, t, t1, source);
                        TrajectoryError::Sample {
                            step,
                            from: t,
                            to: t1,
                            source,
                        }
                    })?;

                let state = ParcelState::new(
                    t1,
                    next.latitude,
                    normalize_longitude(next.longitude),
                    next.level,
                );
                states.push(emit(state)?);
                Ok::<_, TrajectoryError>(Position::new(state.longitude, state.latitude, state.level))
            })?;

        let trajectory = Trajectory::from_states(states);
        if let Some(end) = trajectory.last() {
            debug!(
                "Trajectory ends at ({:.3}N, {:.3}E, {:.1} hPa) at {}",
                end.latitude, end.longitude, end.level, end.time
            );
        }
        info!(
            "Back trajectory complete: {} points, {} travelled",
            trajectory.len(),
            trajectory.total_distance(self.config.earth_radius_km)
        );
        Ok(trajectory)
    }
}

/// Back trajectory with the default configuration
///
/// Convenience wrapper over [`TrajectoryEngine`]: `start` is
/// `(latitude, longitude)` in degrees, `level` in hPa, and `temperature` an
/// optional field sampled at every emitted state.
///
/// # Errors
/// See [`TrajectoryEngine::run`]
pub fn back_trajectory(
    start: (f64, f64),
    level: f64,
    times: &[Timestamp],
    u: &dyn ScalarField,
    v: &dyn ScalarField,
    w: &dyn ScalarField,
    temperature: Option<&dyn ScalarField>,
) -> Result<Trajectory, TrajectoryError> {
    let engine = TrajectoryEngine::new(u, v, w);
    let engine = match temperature {
        Some(field) => engine.with_annotation(field),
        None => engine,
    };
    engine.run(start.0, start.1, level, times)
}
