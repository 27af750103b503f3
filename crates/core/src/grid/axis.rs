//! Monotonic coordinate axes with label-based selection
//!
//! Reanalysis products disagree on axis direction: ERA5 stores latitude from
//! +90 down to -90, NCEP R1 stores levels from 1000 hPa upward. Selection
//! follows label-slice semantics: `select(start, stop)` walks the axis in its
//! native order, so the bounds must be given in that order as well. A reversed
//! slice on a descending axis selects nothing.

use crate::error::{Axis, FieldError};
use std::ops::RangeInclusive;

/// Direction of a coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// Values increase with index
    Ascending,
    /// Values decrease with index
    Descending,
}

/// Interpolation stencil along one axis: two `(index, weight)` pairs
///
/// When the query sits exactly on a node both entries may share an index with
/// the second weight zero.
pub type Stencil = [(usize, f64); 2];

/// A strictly monotonic coordinate axis
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAxis {
    kind: Axis,
    values: Vec<f64>,
    order: AxisOrder,
}

impl FieldAxis {
    /// Validate and build an axis
    ///
    /// A single-node axis counts as ascending.
    ///
    /// # Errors
    /// Returns `FieldError::EmptyAxis` for no values and
    /// `FieldError::NonMonotonicAxis` for repeated, unordered or non-finite values
    pub fn new(kind: Axis, values: Vec<f64>) -> Result<Self, FieldError> {
        if values.is_empty() {
            return Err(FieldError::EmptyAxis { axis: kind });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::NonMonotonicAxis { axis: kind });
        }

        let order = if values.len() > 1 && values[1] < values[0] {
            AxisOrder::Descending
        } else {
            AxisOrder::Ascending
        };
        let monotonic = values.windows(2).all(|w| match order {
            AxisOrder::Ascending => w[1] > w[0],
            AxisOrder::Descending => w[1] < w[0],
        });
        if !monotonic {
            return Err(FieldError::NonMonotonicAxis { axis: kind });
        }

        Ok(Self {
            kind,
            values,
            order,
        })
    }

    /// Which grid axis this is
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Axis {
        self.kind
    }

    /// Coordinate values in native order
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated axis
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Native direction
    #[inline]
    #[must_use]
    pub fn order(&self) -> AxisOrder {
        self.order
    }

    /// Smallest coordinate value
    #[must_use]
    pub fn min(&self) -> f64 {
        match self.order {
            AxisOrder::Ascending => self.values[0],
            AxisOrder::Descending => self.values[self.values.len() - 1],
        }
    }

    /// Largest coordinate value
    #[must_use]
    pub fn max(&self) -> f64 {
        match self.order {
            AxisOrder::Ascending => self.values[self.values.len() - 1],
            AxisOrder::Descending => self.values[0],
        }
    }

    /// Label slice `start..=stop` in native order
    ///
    /// Returns the contiguous index range of nodes between the bounds, or
    /// `None` when the slice is empty (including bounds given against the
    /// axis direction and NaN bounds).
    #[must_use]
    pub fn select(&self, start: f64, stop: f64) -> Option<RangeInclusive<usize>> {
        let (lo, hi) = match self.order {
            AxisOrder::Ascending => (start, stop),
            AxisOrder::Descending => (stop, start),
        };
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return None;
        }
        let inside = |v: &f64| *v >= lo && *v <= hi;
        let first = self.values.iter().position(inside)?;
        let last = self.values.iter().rposition(inside)?;
        Some(first..=last)
    }

    /// Linear interpolation stencil for `x` using only nodes in `range`
    ///
    /// Returns `None` when `x` lies outside the span of the selected nodes, so
    /// interpolation never extrapolates past the window.
    #[must_use]
    pub fn stencil(&self, range: &RangeInclusive<usize>, x: f64) -> Option<Stencil> {
        let (start, end) = (*range.start(), *range.end());
        if end >= self.values.len() || start > end {
            return None;
        }
        if start == end {
            return (self.values[start] == x).then_some([(start, 1.0), (start, 0.0)]);
        }
        for i in start..end {
            let a = self.values[i];
            let b = self.values[i + 1];
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            if x >= lo && x <= hi {
                let t = (x - a) / (b - a);
                return Some([(i, 1.0 - t), (i + 1, t)]);
            }
        }
        None
    }
}
