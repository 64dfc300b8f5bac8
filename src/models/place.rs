//! Canonical place entity handed to callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Category;
use crate::geodesy::Coordinate;

/// Prefix reserved for places that carry a message instead of real data
pub const SYNTHETIC_PREFIX: &str = "synthetic/";

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
    /// Anything else the server emits (areas, derived elements)
    #[serde(other)]
    Other,
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
            OsmType::Other => write!(f, "other"),
        }
    }
}

/// Where a place is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Street line ("12 Rue de Rivoli")
    #[serde(default)]
    pub address: String,
    /// Full postal line ("12 Rue de Rivoli, 75001 Paris")
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl Location {
    pub fn at(coord: Coordinate) -> Self {
        Self {
            lat: coord.lat,
            lon: coord.lon,
            ..Default::default()
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// A point of interest as seen from one observer.
///
/// `distance` is relative to the observer the place was built for; the same
/// source element yields different distances for different observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// "{osm_type}/{osm_id}" for real places, `synthetic/...` for messages
    pub id: String,

    pub name: String,

    /// Structured category the label was derived from
    pub category: Category,

    /// Human-readable category label ("Restaurant", "Museum", ...)
    pub main_category: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,

    pub location: Location,

    /// Whole meters from the observer, truncated
    pub distance: u32,

    /// Source tags, kept so the category can be re-derived
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

impl Place {
    /// Create a place with minimal required fields
    pub fn new(id: String, name: String, category: Category, location: Location) -> Self {
        Self {
            id,
            name,
            main_category: category.label().to_string(),
            category,
            description: String::new(),
            website: None,
            phone: None,
            opening_hours: None,
            location,
            distance: 0,
            tags: HashMap::new(),
        }
    }

    /// Build an in-band message placed at `center`
    pub fn synthetic(key: &str, name: &str, description: &str, center: Coordinate) -> Self {
        let mut place = Self::new(
            format!("{}{}", SYNTHETIC_PREFIX, key),
            name.to_string(),
            Category::Generic,
            Location::at(center),
        );
        place.description = description.to_string();
        place
    }

    pub fn is_synthetic(&self) -> bool {
        self.id.starts_with(SYNTHETIC_PREFIX)
    }

    pub fn coordinate(&self) -> Coordinate {
        self.location.coordinate()
    }

    /// Recompute `distance` for a new observer
    pub fn measure_from(&mut self, observer: &Coordinate) {
        self.distance = truncate_meters(observer.distance_to(&self.coordinate()));
    }
}

/// Whole meters by truncation, clamped into `u32`
pub fn truncate_meters(meters: f64) -> u32 {
    if meters.is_nan() || meters <= 0.0 {
        0
    } else if meters >= u32::MAX as f64 {
        u32::MAX
    } else {
        meters.trunc() as u32
    }
}
