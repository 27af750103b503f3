//! Parcel stepping
//!
//! [`StepIntegrator`] advances a parcel across one interval of the requested
//! time sequence using a Heun predictor-corrector over sampled u, v and omega
//! fields. [`euler_step`] is the single-phase displacement both phases share.

pub mod step;

// Re-exports
pub use step::{euler_step, wind_heading, Direction, Position, StepIntegrator};
