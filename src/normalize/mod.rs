//! Turns raw Overpass elements into [`Place`]s for a given observer.

mod address;

pub use address::{street_line, synthesize_address};

use tracing::debug;

use crate::geodesy::Coordinate;
use crate::models::place::truncate_meters;
use crate::models::{Category, Location, Place, RawGeoElement};

/// Placeholder some sources put in `name` instead of leaving it empty
pub const UNNAMED_SENTINEL: &str = "unnamed place";

/// Converts raw elements into places; stateless apart from name preferences
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    /// Preferred `name:<lang>` variant, if any
    language: Option<String>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: Option<String>) -> Self {
        Self {
            language: language.filter(|l| !l.trim().is_empty()),
        }
    }

    /// Normalize one element, or `None` when it is not a usable POI
    pub fn normalize(&self, element: &RawGeoElement, observer: &Coordinate) -> Option<Place> {
        let Some(name) = self.display_name(element) else {
            debug!("Rejecting {}: no usable name", element.source_id());
            return None;
        };

        let Some(coord) = element.coordinate() else {
            debug!("Rejecting {}: no coordinate", element.source_id());
            return None;
        };

        if !Category::is_categorized(&element.tags) {
            debug!("Rejecting {}: no category tag", element.source_id());
            return None;
        }

        let category = Category::from_tags(&element.tags);

        let location = Location {
            lat: coord.lat,
            lon: coord.lon,
            address: street_line(&element.tags),
            formatted_address: synthesize_address(&element.tags),
            city: element.tag("addr:city").unwrap_or_default().to_string(),
            country: element.tag("addr:country").unwrap_or_default().to_string(),
        };

        let mut place = Place::new(element.source_id(), name, category, location);
        place.description = element.tag("description").unwrap_or_default().to_string();
        place.website = element
            .tag("website")
            .or_else(|| element.tag("contact:website"))
            .map(String::from);
        place.phone = element
            .tag("phone")
            .or_else(|| element.tag("contact:phone"))
            .map(String::from);
        place.opening_hours = element.tag("opening_hours").map(String::from);
        place.distance = truncate_meters(observer.distance_to(&coord));
        place.tags = element.tags.clone();

        Some(place)
    }

    /// Normalize a batch, dropping rejected elements and keeping input order
    pub fn normalize_all<'a, I>(&self, elements: I, observer: &Coordinate) -> Vec<Place>
    where
        I: IntoIterator<Item = &'a RawGeoElement>,
    {
        elements
            .into_iter()
            .filter_map(|e| self.normalize(e, observer))
            .collect()
    }

    fn display_name(&self, element: &RawGeoElement) -> Option<String> {
        let localized = self
            .language
            .as_ref()
            .and_then(|lang| element.tag(&format!("name:{}", lang)));

        let name = localized.or_else(|| element.tag("name"))?;
        if name.eq_ignore_ascii_case(UNNAMED_SENTINEL) {
            return None;
        }
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OverpassResponse;

    const OBSERVER: Coordinate = Coordinate::new(48.8566, 2.3522);

    fn element(json: serde_json::Value) -> RawGeoElement {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_accepts_cafe() {
        let e = element(serde_json::json!({
            "type": "node", "id": 42, "lat": 48.8570, "lon": 2.3530,
            "tags": {"name": "Café de Flore", "amenity": "cafe"}
        }));
        let place = Normalizer::new().normalize(&e, &OBSERVER).unwrap();
        assert_eq!(place.id, "node/42");
        assert_eq!(place.name, "Café de Flore");
        assert_eq!(place.main_category, "Café");
        assert_eq!(place.category, Category::Amenity("cafe".into()));
        assert_eq!(place.tags.get("amenity").map(String::as_str), Some("cafe"));
    }

    #[test]
    fn test_rejects_without_category() {
        let e = element(serde_json::json!({
            "type": "node", "id": 1, "lat": 48.0, "lon": 2.0, "tags": {"name": "Somewhere"}
        }));
        assert!(Normalizer::new().normalize(&e, &OBSERVER).is_none());

        let e = element(serde_json::json!({"type": "node", "id": 1, "lat": 48.0, "lon": 2.0, "tags": {}}));
        assert!(Normalizer::new().normalize(&e, &OBSERVER).is_none());
    }

    #[test]
    fn test_rejects_unnamed() {
        let e = element(serde_json::json!({
            "type": "node", "id": 1, "lat": 48.0, "lon": 2.0, "tags": {"amenity": "cafe"}
        }));
        assert!(Normalizer::new().normalize(&e, &OBSERVER).is_none());

        let e = element(serde_json::json!({
            "type": "node", "id": 1, "lat": 48.0, "lon": 2.0,
            "tags": {"amenity": "cafe", "name": "Unnamed Place"}
        }));
        assert!(Normalizer::new().normalize(&e, &OBSERVER).is_none());
    }

    #[test]
    fn test_rejects_without_coordinate() {
        let e = element(serde_json::json!({
            "type": "way", "id": 1, "geometry": [], "tags": {"amenity": "cafe", "name": "Ghost"}
        }));
        assert!(Normalizer::new().normalize(&e, &OBSERVER).is_none());
    }

    #[test]
    fn test_way_uses_first_geometry_point() {
        let e = element(serde_json::json!({
            "type": "way", "id": 7,
            "geometry": [{"lat": 48.8606, "lon": 2.3376}, {"lat": 48.8610, "lon": 2.3380}],
            "tags": {"name": "Louvre", "tourism": "museum"}
        }));
        let place = Normalizer::new().normalize(&e, &OBSERVER).unwrap();
        assert_eq!(place.location.lat, 48.8606);
        assert_eq!(place.location.lon, 2.3376);
        assert_eq!(place.main_category, "Museum");
    }

    #[test]
    fn test_distance_is_truncated_not_rounded() {
        // 0.01° of latitude is 1111.95 m on a 6371 km sphere
        let e = element(serde_json::json!({
            "type": "node", "id": 3, "lat": 0.01, "lon": 0.0,
            "tags": {"name": "North", "amenity": "bar"}
        }));
        let place = Normalizer::new()
            .normalize(&e, &Coordinate::new(0.0, 0.0))
            .unwrap();
        assert_eq!(place.distance, 1111);
    }

    #[test]
    fn test_distance_depends_on_observer() {
        let e = element(serde_json::json!({
            "type": "node", "id": 3, "lat": 0.01, "lon": 0.0,
            "tags": {"name": "North", "amenity": "bar"}
        }));
        let normalizer = Normalizer::new();
        let near = normalizer.normalize(&e, &Coordinate::new(0.01, 0.0)).unwrap();
        let far = normalizer.normalize(&e, &Coordinate::new(0.0, 0.0)).unwrap();
        assert_eq!(near.distance, 0);
        assert!(far.distance > near.distance);
    }

    #[test]
    fn test_contact_fields_and_address() {
        let e = element(serde_json::json!({
            "type": "node", "id": 9, "lat": 48.0, "lon": 2.0,
            "tags": {
                "name": "Le Bistro", "amenity": "restaurant",
                "contact:website": "https://bistro.example", "phone": "+33 1 23",
                "opening_hours": "Mo-Su 12:00-23:00", "description": "Classic bistro",
                "addr:housenumber": "12", "addr:street": "Rue de Rivoli",
                "addr:postcode": "75001", "addr:city": "Paris", "addr:country": "FR"
            }
        }));
        let place = Normalizer::new().normalize(&e, &OBSERVER).unwrap();
        assert_eq!(place.website.as_deref(), Some("https://bistro.example"));
        assert_eq!(place.phone.as_deref(), Some("+33 1 23"));
        assert_eq!(place.opening_hours.as_deref(), Some("Mo-Su 12:00-23:00"));
        assert_eq!(place.description, "Classic bistro");
        assert_eq!(place.location.address, "12 Rue de Rivoli");
        assert_eq!(place.location.formatted_address, "12 Rue de Rivoli, 75001 Paris");
        assert_eq!(place.location.city, "Paris");
        assert_eq!(place.location.country, "FR");
    }

    #[test]
    fn test_preferred_language() {
        let e = element(serde_json::json!({
            "type": "node", "id": 10, "lat": 48.0, "lon": 2.0,
            "tags": {"name": "Musée du Louvre", "name:en": "Louvre Museum", "tourism": "museum"}
        }));
        let en = Normalizer::with_language(Some("en".into()));
        assert_eq!(en.normalize(&e, &OBSERVER).unwrap().name, "Louvre Museum");
        let de = Normalizer::with_language(Some("de".into()));
        assert_eq!(de.normalize(&e, &OBSERVER).unwrap().name, "Musée du Louvre");
    }

    #[test]
    fn test_normalize_all_keeps_order() {
        let body = r#"{"elements": [
            {"type": "node", "id": 1, "lat": 48.0, "lon": 2.0, "tags": {"name": "B", "shop": "books"}},
            {"type": "node", "id": 2, "lat": 48.0, "lon": 2.0, "tags": {"name": "skip"}},
            {"type": "node", "id": 3, "lat": 48.0, "lon": 2.0, "tags": {"name": "A", "leisure": "park"}}
        ]}"#;
        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        let places = Normalizer::new().normalize_all(&response.elements, &OBSERVER);
        let ids: Vec<&str> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["node/1", "node/3"]);
    }
}
