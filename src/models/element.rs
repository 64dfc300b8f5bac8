//! Raw elements as returned by an Overpass interpreter.

use serde::Deserialize;
use std::collections::HashMap;

use super::OsmType;
use crate::geodesy::Coordinate;

/// Top-level `[out:json]` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<RawGeoElement>,

    /// Runtime error/remark reported by the server inside a 200 response
    #[serde(default)]
    pub remark: Option<String>,
}

/// One element of an Overpass response
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeoElement {
    #[serde(rename = "type")]
    pub kind: OsmType,

    pub id: i64,

    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,

    /// Present with `out center;`
    #[serde(default)]
    pub center: Option<Coordinate>,

    /// Present for ways with `out geom;`; entries may be null
    #[serde(default)]
    pub geometry: Vec<Option<Coordinate>>,

    /// Present for relations with `out geom;`
    #[serde(default)]
    pub members: Vec<RawMember>,

    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Relation member with its inlined geometry
#[derive(Debug, Clone, Deserialize)]
pub struct RawMember {
    #[serde(rename = "type", default)]
    pub kind: Option<OsmType>,

    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,

    #[serde(default)]
    pub geometry: Vec<Option<Coordinate>>,
}

impl RawGeoElement {
    /// Stable identifier, "{type}/{id}"
    pub fn source_id(&self) -> String {
        format!("{}/{}", self.kind, self.id)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Resolve a single coordinate for this element.
    ///
    /// Direct lat/lon wins, then the server-computed center, then the first
    /// point of the way geometry, then the first point of any relation member.
    pub fn coordinate(&self) -> Option<Coordinate> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some(Coordinate::new(lat, lon));
        }
        if let Some(center) = self.center {
            return Some(center);
        }
        if let Some(first) = self.geometry.iter().flatten().next() {
            return Some(*first);
        }
        self.members.iter().find_map(|member| match (member.lat, member.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => member.geometry.iter().flatten().next().copied(),
        })
    }
}
