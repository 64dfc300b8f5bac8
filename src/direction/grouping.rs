use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::geodesy::{cardinal_octant, Coordinate, Octant};
use crate::models::Place;

/// Places lying in one compass octant, in discovery order
#[derive(Debug, Clone, PartialEq)]
pub struct CardinalGroup {
    pub octant: Octant,
    pub places: Vec<Place>,
}

impl CardinalGroup {
    fn empty(octant: Octant) -> Self {
        Self {
            octant,
            places: Vec::new(),
        }
    }

    pub fn direction(&self) -> &'static str {
        self.octant.label()
    }

    pub fn glyph(&self) -> &'static str {
        self.octant.glyph()
    }

    pub fn count(&self) -> usize {
        self.places.len()
    }
}

impl Serialize for CardinalGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CardinalGroup", 4)?;
        state.serialize_field("direction", self.direction())?;
        state.serialize_field("glyph", self.glyph())?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("places", &self.places)?;
        state.end()
    }
}

/// Bucket places into octants as seen from `observer`.
///
/// Only non-empty groups are returned, always in N, NE, E, SE, S, SW, W, NW
/// order. Places with an invalid coordinate are skipped.
pub fn group_by_direction(places: &[Place], observer: &Coordinate) -> Vec<CardinalGroup> {
    let mut groups: Vec<CardinalGroup> = Octant::ALL.into_iter().map(CardinalGroup::empty).collect();

    for place in places {
        let target = place.coordinate();
        if target.validate().is_err() {
            continue;
        }
        let octant = cardinal_octant(observer.bearing_to(&target));
        groups[octant.index()].places.push(place.clone());
    }

    groups.retain(|g| !g.places.is_empty());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Location};

    const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

    fn place(id: &str, lat: f64, lon: f64) -> Place {
        Place::new(
            id.to_string(),
            id.to_string(),
            Category::Generic,
            Location::at(Coordinate::new(lat, lon)),
        )
    }

    #[test]
    fn test_groups_in_compass_order() {
        let places = vec![
            place("west", 0.0, -0.01),
            place("north", 0.01, 0.0),
            place("south-east", -0.01, 0.01),
        ];
        let groups = group_by_direction(&places, &ORIGIN);
        let labels: Vec<&str> = groups.iter().map(|g| g.direction()).collect();
        assert_eq!(labels, vec!["N", "SE", "W"]);
        assert_eq!(groups[0].glyph(), "↑");
    }

    #[test]
    fn test_members_keep_discovery_order() {
        let places = vec![
            place("far-north", 0.05, 0.0),
            place("near-north", 0.001, 0.0),
            place("mid-north", 0.01, 0.0),
        ];
        let groups = group_by_direction(&places, &ORIGIN);
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["far-north", "near-north", "mid-north"]);
        assert_eq!(groups[0].count(), 3);
    }

    #[test]
    fn test_every_place_lands_in_exactly_one_group() {
        let places: Vec<Place> = (0..72)
            .map(|i| {
                let angle = (i as f64 * 5.0).to_radians();
                place(&format!("p{}", i), 0.01 * angle.cos(), 0.01 * angle.sin())
            })
            .collect();
        let groups = group_by_direction(&places, &ORIGIN);
        let total: usize = groups.iter().map(CardinalGroup::count).sum();
        assert_eq!(total, places.len());
        assert_eq!(groups.len(), 8);
    }

    #[test]
    fn test_invalid_coordinates_are_skipped() {
        let places = vec![place("ok", 0.01, 0.0), place("bad", f64::NAN, 0.0)];
        let groups = group_by_direction(&places, &ORIGIN);
        let total: usize = groups.iter().map(CardinalGroup::count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_direction(&[], &ORIGIN).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let groups = group_by_direction(&[place("east", 0.0, 0.01)], &ORIGIN);
        let json = serde_json::to_value(&groups[0]).unwrap();
        assert_eq!(json["direction"], "E");
        assert_eq!(json["glyph"], "→");
        assert_eq!(json["count"], 1);
        assert_eq!(json["places"][0]["id"], "east");
    }
}
