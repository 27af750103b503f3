//! Trajectory integration over whole time sequences
//!
//! [`TrajectoryEngine`] drives the predictor-corrector step across a time
//! sequence and emits one [`ParcelState`](crate::core_types::parcel::ParcelState)
//! per timestamp. [`back_trajectories`] fans many release points out over the
//! rayon pool.

pub mod batch;
pub mod engine;
pub mod times;

pub use batch::{back_trajectories, ReleasePoint};
pub use engine::{back_trajectory, Annotator, TrajectoryEngine};
pub use times::backward_times;
