//! Parcel states and the ordered trajectory they form

use crate::core_types::units::{Hectopascals, Hours, Kilometers};
use crate::physics::geodesic::great_circle_distance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Instant on a field's time axis
pub type Timestamp = DateTime<Utc>;

/// Position of an air parcel at one instant
///
/// Produced once per requested timestamp and never modified afterwards; the
/// engine threads fresh values from one step to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParcelState {
    /// Valid time of this position
    pub time: Timestamp,
    /// Latitude in degrees north (-90..90)
    pub latitude: f64,
    /// Longitude in degrees east (0..360)
    pub longitude: f64,
    /// Pressure level in hPa
    pub level: f64,
    /// Optional scalar sampled at this position (e.g. temperature in K)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<f64>,
}

impl ParcelState {
    /// Create a state without an auxiliary annotation
    #[must_use]
    pub fn new(time: Timestamp, latitude: f64, longitude: f64, level: f64) -> Self {
        Self {
            time,
            latitude,
            longitude,
            level,
            auxiliary: None,
        }
    }

    /// Copy of this state carrying an auxiliary value
    #[must_use]
    pub fn with_auxiliary(self, value: f64) -> Self {
        Self {
            auxiliary: Some(value),
            ..self
        }
    }

    /// Pressure level as a typed quantity
    #[inline]
    #[must_use]
    pub fn pressure(&self) -> Hectopascals {
        Hectopascals::new(self.level)
    }
}

/// Ordered parcel path, one state per requested timestamp
///
/// The order is the order of the requested time sequence (normally "now"
/// first, earliest last) and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    states: Vec<ParcelState>,
}

impl Trajectory {
    pub(crate) fn from_states(states: Vec<ParcelState>) -> Self {
        Self { states }
    }

    /// Number of states
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when the trajectory has no states
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States in replay order
    #[must_use]
    pub fn states(&self) -> &[ParcelState] {
        &self.states
    }

    /// Iterate states in replay order
    pub fn iter(&self) -> std::slice::Iter<'_, ParcelState> {
        self.states.iter()
    }

    /// Starting state (the release point)
    #[must_use]
    pub fn first(&self) -> Option<&ParcelState> {
        self.states.first()
    }

    /// Final state (the earliest requested time for a back trajectory)
    #[must_use]
    pub fn last(&self) -> Option<&ParcelState> {
        self.states.last()
    }

    /// State at an exact timestamp, if it was requested
    #[must_use]
    pub fn at(&self, time: Timestamp) -> Option<&ParcelState> {
        self.states.iter().find(|s| s.time == time)
    }

    /// Consume into the underlying states
    #[must_use]
    pub fn into_states(self) -> Vec<ParcelState> {
        self.states
    }

    /// Summed great-circle length of all segments
    #[must_use]
    pub fn total_distance(&self, earth_radius_km: f64) -> Kilometers {
        self.states
            .windows(2)
            .map(|pair| {
                great_circle_distance(
                    pair[0].longitude,
                    pair[0].latitude,
                    pair[1].longitude,
                    pair[1].latitude,
                    earth_radius_km,
                )
            })
            .fold(Kilometers::new(0.0), |acc, d| acc + d)
    }

    /// Absolute time span between the first and last state
    #[must_use]
    pub fn duration(&self) -> Hours {
        match (self.states.first(), self.states.last()) {
            (Some(a), Some(b)) => Hours::new(Hours::from_duration(a.time - b.time).value().abs()),
            _ => Hours::new(0.0),
        }
    }

    /// Pressure change from the release point to the final state
    ///
    /// Positive when the parcel sat at higher pressure (lower altitude) at the
    /// final (earliest) time.
    #[must_use]
    pub fn level_change(&self) -> Hectopascals {
        match (self.states.first(), self.states.last()) {
            (Some(a), Some(b)) => b.pressure() - a.pressure(),
            _ => Hectopascals::new(0.0),
        }
    }

    /// Write as CSV: `time,latitude,longitude,level[,auxiliary]`
    ///
    /// The auxiliary column is present only when any state carries a value.
    ///
    /// # Errors
    /// Returns any error raised by the writer
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        let annotated = self.states.iter().any(|s| s.auxiliary.is_some());
        if annotated {
            writeln!(out, "time,latitude,longitude,level,auxiliary")?;
        } else {
            writeln!(out, "time,latitude,longitude,level")?;
        }
        for s in &self.states {
            write!(
                out,
                "{},{:.6},{:.6},{:.4}",
                s.time.to_rfc3339(),
                s.latitude,
                s.longitude,
                s.level
            )?;
            if annotated {
                match s.auxiliary {
                    Some(v) => write!(out, ",{v:.4}")?,
                    None => write!(out, ",")?,
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a ParcelState;
    type IntoIter = std::slice::Iter<'a, ParcelState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}
