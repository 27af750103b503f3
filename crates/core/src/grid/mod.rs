//! Gridded fields and windowed sampling

pub mod axis;
pub mod field;
pub mod sampler;
pub mod window;

// Re-export main types
pub use axis::{AxisOrder, FieldAxis, Stencil};
pub use field::{GriddedField, ScalarField};
pub use sampler::FieldSampler;
pub use window::{Band, LongitudeConvention, SamplingWindow};
