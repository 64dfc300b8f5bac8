//! POI categories derived from OSM tags, with display labels.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Primary category of a place, carrying the raw OSM tag value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", content = "value", rename_all = "lowercase")]
pub enum Category {
    Tourism(String),
    Historic(String),
    Leisure(String),
    Shop(String),
    Amenity(String),
    Generic,
}

/// Tag keys that make an element a point of interest, in derivation priority
pub const CATEGORY_KEYS: [&str; 5] = ["tourism", "historic", "leisure", "shop", "amenity"];

const TOURISM_LABELS: &[(&str, &str)] = &[
    ("attraction", "Attraction"),
    ("museum", "Museum"),
    ("gallery", "Gallery"),
    ("artwork", "Artwork"),
    ("viewpoint", "Viewpoint"),
    ("information", "Tourist Information"),
    ("hotel", "Hotel"),
    ("hostel", "Hostel"),
    ("guest_house", "Guest House"),
    ("zoo", "Zoo"),
    ("aquarium", "Aquarium"),
    ("theme_park", "Theme Park"),
    ("picnic_site", "Picnic Site"),
    ("camp_site", "Campsite"),
];

const HISTORIC_LABELS: &[(&str, &str)] = &[
    ("monument", "Monument"),
    ("memorial", "Memorial"),
    ("castle", "Castle"),
    ("ruins", "Ruins"),
    ("archaeological_site", "Archaeological Site"),
    ("fort", "Fort"),
    ("city_gate", "City Gate"),
    ("building", "Historic Building"),
    ("church", "Historic Church"),
    ("wayside_cross", "Wayside Cross"),
];

const LEISURE_LABELS: &[(&str, &str)] = &[
    ("park", "Park"),
    ("garden", "Garden"),
    ("playground", "Playground"),
    ("sports_centre", "Sports Centre"),
    ("swimming_pool", "Swimming Pool"),
    ("golf_course", "Golf Course"),
    ("marina", "Marina"),
    ("stadium", "Stadium"),
    ("nature_reserve", "Nature Reserve"),
];

const SHOP_LABELS: &[(&str, &str)] = &[
    ("mall", "Shopping Mall"),
    ("supermarket", "Supermarket"),
    ("convenience", "Convenience Store"),
    ("books", "Bookshop"),
    ("clothes", "Clothing Store"),
    ("electronics", "Electronics Store"),
    ("gifts", "Gift Shop"),
    ("jewelry", "Jewellery"),
    ("art", "Art Shop"),
    ("bakery", "Bakery"),
    ("butcher", "Butcher"),
];

const AMENITY_LABELS: &[(&str, &str)] = &[
    ("restaurant", "Restaurant"),
    ("cafe", "Café"),
    ("bar", "Bar"),
    ("pub", "Pub"),
    ("fast_food", "Fast Food"),
    ("museum", "Museum"),
    ("theatre", "Theatre"),
    ("cinema", "Cinema"),
    ("library", "Library"),
    ("hospital", "Hospital"),
    ("pharmacy", "Pharmacy"),
    ("bank", "Bank"),
    ("atm", "ATM"),
    ("fuel", "Fuel Station"),
    ("parking", "Parking"),
    ("toilets", "Toilets"),
    ("school", "School"),
    ("place_of_worship", "Place of Worship"),
    ("ice_cream", "Ice Cream"),
    ("marketplace", "Marketplace"),
];

fn lookup(table: &'static [(&'static str, &'static str)], value: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == value)
        .map(|(_, label)| *label)
}

impl Category {
    /// Derive the category from a tag map.
    ///
    /// tourism beats historic beats leisure beats shop beats amenity.
    pub fn from_tags(tags: &HashMap<String, String>) -> Self {
        for key in CATEGORY_KEYS {
            if let Some(value) = tags.get(key) {
                if let Some(category) = Self::from_tag(key, value) {
                    return category;
                }
            }
        }
        Category::Generic
    }

    /// Build the category for a single `key=value` pair
    pub fn from_tag(key: &str, value: &str) -> Option<Self> {
        let value = value.to_string();
        match key {
            "tourism" => Some(Category::Tourism(value)),
            "historic" => Some(Category::Historic(value)),
            "leisure" => Some(Category::Leisure(value)),
            "shop" => Some(Category::Shop(value)),
            "amenity" => Some(Category::Amenity(value)),
            _ => None,
        }
    }

    /// Whether any recognized category key is present
    pub fn is_categorized(tags: &HashMap<String, String>) -> bool {
        CATEGORY_KEYS.iter().any(|key| tags.contains_key(*key))
    }

    /// Human-readable label; unknown values fall back to the family name
    pub fn label(&self) -> &'static str {
        match self {
            Category::Tourism(v) => lookup(TOURISM_LABELS, v).unwrap_or("Tourism"),
            Category::Historic(v) => lookup(HISTORIC_LABELS, v).unwrap_or("Historic"),
            Category::Leisure(v) => lookup(LEISURE_LABELS, v).unwrap_or("Leisure"),
            Category::Shop(v) => lookup(SHOP_LABELS, v).unwrap_or("Shop"),
            Category::Amenity(v) => lookup(AMENITY_LABELS, v).unwrap_or("Amenity"),
            Category::Generic => "Point of Interest",
        }
    }

    /// The OSM key this category came from
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Category::Tourism(_) => Some("tourism"),
            Category::Historic(_) => Some("historic"),
            Category::Leisure(_) => Some("leisure"),
            Category::Shop(_) => Some("shop"),
            Category::Amenity(_) => Some("amenity"),
            Category::Generic => None,
        }
    }
}
