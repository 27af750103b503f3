//! Semantic unit types for the trajectory integrator
//!
//! Reanalysis fields mix several unit systems: horizontal wind in m/s, vertical
//! motion (omega) in Pa/s, vertical position in hPa, and integration intervals
//! in hours. These newtypes keep the conversions explicit so that a Pa/s value
//! can never be added to a level in hPa without going through
//! [`PascalsPerSecond::to_hpa_per_hour`].
//!
//! # Design Philosophy
//! - All types wrap f64; geodesic work on an Earth-sized sphere needs the precision
//! - Total ordering via `Ord` (NaN sorts greater than all values)
//! - Values are not range-checked: a negative interval is a forward step and a
//!   negative distance is the caller's business
//! - Cross-type operations encode the integrator's unit algebra
//!   (`km/h × h = km`, `hPa/h × h = hPa`)
//!
//! # Usage
//! ```
//! use backtraj_core::core_types::units::{Hours, MetersPerSecond, PascalsPerSecond};
//!
//! let wind = MetersPerSecond::new(10.0);
//! let distance = wind.to_kmh() * Hours::new(6.0);
//! assert!((*distance - 216.0).abs() < 1e-9);
//!
//! let omega = PascalsPerSecond::new(0.5);
//! let dlev = omega.to_hpa_per_hour() * Hours::new(2.0);
//! assert!((*dlev - 36.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Mul, Sub};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TIME
// ============================================================================

/// Time interval in hours
///
/// Signed: the integrator expresses a backward step as a positive interval
/// `t - t1` and lets the heading carry the direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hours(f64);

impl Eq for Hours {}

impl PartialOrd for Hours {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hours {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Hours {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Hours {
    /// Create a new interval in hours
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Hours(value)
    }

    /// Convert a `chrono` duration to fractional hours
    ///
    /// Millisecond resolution is plenty for reanalysis time steps.
    #[inline]
    #[must_use]
    pub fn from_duration(duration: chrono::TimeDelta) -> Self {
        Hours(duration.num_milliseconds() as f64 / 3_600_000.0)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Hours {
    fn from(v: f64) -> Self {
        Hours(v)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} h", self.0)
    }
}

// ============================================================================
// HORIZONTAL VELOCITY
// ============================================================================

/// Horizontal wind component in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

impl Eq for MetersPerSecond {}

impl PartialOrd for MetersPerSecond {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetersPerSecond {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for MetersPerSecond {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl MetersPerSecond {
    /// m/s → km/h
    const KMH_PER_MPS: f64 = 3.6;

    /// Create a new velocity
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to km/h
    #[inline]
    #[must_use]
    pub fn to_kmh(self) -> KilometersPerHour {
        KilometersPerHour(self.0 * Self::KMH_PER_MPS)
    }
}

impl From<f64> for MetersPerSecond {
    fn from(v: f64) -> Self {
        MetersPerSecond(v)
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m/s", self.0)
    }
}

/// Horizontal speed in kilometers per hour
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilometersPerHour(f64);

impl Deref for KilometersPerHour {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl KilometersPerHour {
    /// Create a new speed in km/h
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KilometersPerHour(value)
    }
}

// Cross-type operation: speed × time = distance
impl Mul<Hours> for KilometersPerHour {
    type Output = Kilometers;
    fn mul(self, rhs: Hours) -> Kilometers {
        Kilometers(self.0 * rhs.0)
    }
}

impl fmt::Display for KilometersPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km/h", self.0)
    }
}

// ============================================================================
// VERTICAL MOTION
// ============================================================================

/// Vertical pressure velocity (omega) in pascals per second
///
/// Positive omega is descending motion (pressure increasing along the path).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PascalsPerSecond(f64);

impl Deref for PascalsPerSecond {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl PascalsPerSecond {
    /// 1 Pa/s = 3600 Pa/h = 36 hPa/h
    const HPA_PER_HOUR_PER_PA_PER_SECOND: f64 = 36.0;

    /// Create a new vertical velocity
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        PascalsPerSecond(value)
    }

    /// Convert to hPa/h
    #[inline]
    #[must_use]
    pub fn to_hpa_per_hour(self) -> HectopascalsPerHour {
        HectopascalsPerHour(self.0 * Self::HPA_PER_HOUR_PER_PA_PER_SECOND)
    }
}

impl From<f64> for PascalsPerSecond {
    fn from(v: f64) -> Self {
        PascalsPerSecond(v)
    }
}

impl fmt::Display for PascalsPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} Pa/s", self.0)
    }
}

/// Vertical pressure velocity in hectopascals per hour
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct HectopascalsPerHour(f64);

impl Deref for HectopascalsPerHour {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

// Cross-type operation: rate × time = pressure change
impl Mul<Hours> for HectopascalsPerHour {
    type Output = Hectopascals;
    fn mul(self, rhs: Hours) -> Hectopascals {
        Hectopascals(self.0 * rhs.0)
    }
}

// ============================================================================
// PRESSURE
// ============================================================================

/// Pressure (or pressure difference) in hectopascals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hectopascals(f64);

impl Eq for Hectopascals {}

impl PartialOrd for Hectopascals {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hectopascals {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Hectopascals {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Hectopascals {
    /// Create a new pressure value
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Hectopascals(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Sub for Hectopascals {
    type Output = Hectopascals;
    fn sub(self, rhs: Hectopascals) -> Hectopascals {
        Hectopascals(self.0 - rhs.0)
    }
}

impl fmt::Display for Hectopascals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} hPa", self.0)
    }
}

// ============================================================================
// DISTANCE
// ============================================================================

/// Great-circle distance in kilometers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(f64);

impl Eq for Kilometers {}

impl PartialOrd for Kilometers {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kilometers {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Kilometers {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kilometers {
    /// Create a new distance in kilometers
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Kilometers(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Add for Kilometers {
    type Output = Kilometers;
    fn add(self, rhs: Kilometers) -> Kilometers {
        Kilometers(self.0 + rhs.0)
    }
}

impl fmt::Display for Kilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle in radians
///
/// Headings are carried as radians between the wind conversion and the
/// geodesic stepper; degrees only appear at the lon/lat boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f64);

impl Deref for Radians {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Radians {
    /// Create a new angle in radians
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Radians(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Compute sine
    #[inline]
    #[must_use]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    /// Compute cosine
    #[inline]
    #[must_use]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl From<f64> for Radians {
    fn from(v: f64) -> Self {
        Radians(v)
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}
