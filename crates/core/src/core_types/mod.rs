//! Core types and utilities

pub mod parcel;
pub mod units;
pub mod vec3;

pub use parcel::{ParcelState, Timestamp, Trajectory};
pub use units::*;
pub use vec3::WindVector;
