//! Geographic positions and the great-circle distance model.
//!
//! All distances in this crate are haversine distances over a sphere with
//! the mean Earth radius, the same approximation web map clients use. The
//! value returned by [`distance`] is the filter, the sort key and the
//! `distance_m` handed back to callers, so it must be used everywhere.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::errors::{IndexError, IndexResult};

/// Earth's mean radius in meters (WGS84)
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A WGS-84 position in degrees.
///
/// The constructor takes `(latitude, longitude)`, the natural order for
/// geographic coordinates. It does not validate; the index rejects
/// out-of-range positions with [`Position::validate`] before storing or
/// querying them.
///
/// ## Example
///
/// ```rust
/// use facility_index::Position;
///
/// let vienna = Position::new(48.2082, 16.3738);
/// assert!(vienna.validate().is_ok());
/// assert!(Position::new(91.0, 0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both coordinates are finite and within
    /// −90..=90 latitude and −180..=180 longitude.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Checks the coordinate ranges.
    ///
    /// # Errors
    /// Returns [`IndexError::Validation`] naming the offending coordinate.
    pub fn validate(&self) -> IndexResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(IndexError::validation(format!(
                "Latitude must be between -90 and 90 degrees, got: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(IndexError::validation(format!(
                "Longitude must be between -180 and 180 degrees, got: {}",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Great-circle distance to another position in meters.
    pub fn distance_to(&self, other: &Position) -> f64 {
        distance(self, other)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(lat={:.6}, lon={:.6})", self.latitude, self.longitude)
    }
}

/// Calculates the great-circle distance between two positions in meters
/// using the Haversine formula.
///
/// Coordinate deltas are taken as absolute values so that
/// `distance(a, b)` and `distance(b, a)` are bit-for-bit equal.
pub fn distance(a: &Position, b: &Position) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).abs().to_radians();
    let delta_lon = (b.longitude - a.longitude).abs().to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_METERS * c
}

/// Central angle in degrees subtended by a great-circle arc of `meters`.
pub fn angular_radius_degrees(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_METERS).to_degrees()
}
