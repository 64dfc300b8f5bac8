//! Spherical-earth geodesy: distances, bearings and compass octants.
//!
//! Every function here is pure and deterministic; the same inputs always
//! produce the same bits.

mod bearing;
mod haversine;
mod octant;

pub use bearing::{initial_bearing_degrees, normalize_degrees};
pub use haversine::{haversine_meters, EARTH_RADIUS_M};
pub use octant::{cardinal_octant, Octant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating coordinates
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeodesyError {
    #[error("invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate {
        lat: f64,
        lon: f64,
        reason: &'static str,
    },
}

/// A WGS84 latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate, rejecting non-finite or out-of-range values
    pub fn checked(lat: f64, lon: f64) -> Result<Self, GeodesyError> {
        let coord = Self::new(lat, lon);
        coord.validate()?;
        Ok(coord)
    }

    pub fn validate(&self) -> Result<(), GeodesyError> {
        let err = |reason| GeodesyError::InvalidCoordinate {
            lat: self.lat,
            lon: self.lon,
            reason,
        };
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(err("not a finite number"));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(err("latitude outside -90..90"));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(err("longitude outside -180..180"));
        }
        Ok(())
    }

    /// Great-circle distance to `other` in meters
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_meters(self.lat, self.lon, other.lat, other.lon)
    }

    /// Forward azimuth from `self` towards `other`, in `[0, 360)`
    #[inline]
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        initial_bearing_degrees(self.lat, self.lon, other.lat, other.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}
