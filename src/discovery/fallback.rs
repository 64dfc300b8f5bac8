//! What callers get when no real data could be fetched.

use serde::{Deserialize, Serialize};

use super::DiscoveryRequest;
use crate::geodesy::Coordinate;
use crate::models::{Category, Location, Place};

pub const NO_CONNECTIVITY_ID: &str = "synthetic/no-connectivity";
pub const NO_DATA_ID: &str = "synthetic/no-data";
pub const SERVERS_UNAVAILABLE_ID: &str = "synthetic/servers-unavailable";

/// Why discovery ended without real results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The reachability probe failed
    NoConnectivity,
    /// At least one endpoint answered, none with a usable place
    NoData,
    /// Every endpoint failed outright
    ServersUnavailable,
}

/// Produces the places delivered in place of real results
pub trait FallbackStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn fallback(&self, reason: FallbackReason, request: &DiscoveryRequest) -> Vec<Place>;
}

/// One message place per failure mode, centered on the request
#[derive(Debug, Clone, Copy, Default)]
pub struct InformationalFallback;

impl FallbackStrategy for InformationalFallback {
    fn name(&self) -> &'static str {
        "informational"
    }

    fn fallback(&self, reason: FallbackReason, request: &DiscoveryRequest) -> Vec<Place> {
        let (key, name, description) = match reason {
            FallbackReason::NoConnectivity => (
                "no-connectivity",
                "No internet connection",
                "Nearby places could not be loaded. Check your connection and try again.",
            ),
            FallbackReason::NoData => (
                "no-data",
                "No places found in this area",
                "There is no point of interest data for this area. Try a larger radius or another search.",
            ),
            FallbackReason::ServersUnavailable => (
                "servers-unavailable",
                "Map servers unavailable",
                "All map data servers failed to answer. Please try again in a few minutes.",
            ),
        };
        vec![Place::synthetic(key, name, description, request.center)]
    }
}

/// Canned place belonging to a demo region
#[derive(Debug, Clone, Copy)]
pub struct DemoPlace {
    pub name: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub description: &'static str,
}

/// Bounding box of a demo region with its canned places
#[derive(Debug, Clone, Copy)]
pub struct DemoRegion {
    pub name: &'static str,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub places: &'static [DemoPlace],
}

impl DemoRegion {
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }
}

const fn demo(
    name: &'static str,
    key: &'static str,
    value: &'static str,
    lat: f64,
    lon: f64,
    description: &'static str,
) -> DemoPlace {
    DemoPlace {
        name,
        key,
        value,
        lat,
        lon,
        description,
    }
}

pub const DEMO_REGIONS: &[DemoRegion] = &[
    DemoRegion {
        name: "paris",
        min_lat: 48.80,
        max_lat: 48.92,
        min_lon: 2.22,
        max_lon: 2.47,
        places: &[
            demo("Eiffel Tower", "tourism", "attraction", 48.8584, 2.2945, "Wrought-iron lattice tower on the Champ de Mars."),
            demo("Louvre Museum", "tourism", "museum", 48.8606, 2.3376, "The world's most-visited art museum."),
            demo("Notre-Dame de Paris", "historic", "church", 48.8530, 2.3499, "Medieval Catholic cathedral on the Île de la Cité."),
            demo("Jardin du Luxembourg", "leisure", "garden", 48.8462, 2.3372, "Palace gardens in the 6th arrondissement."),
            demo("Café de Flore", "amenity", "cafe", 48.8541, 2.3326, "Historic Saint-Germain café."),
            demo("Shakespeare and Company", "shop", "books", 48.8526, 2.3471, "English-language bookshop on the Left Bank."),
        ],
    },
    DemoRegion {
        name: "rome",
        min_lat: 41.80,
        max_lat: 41.99,
        min_lon: 12.37,
        max_lon: 12.62,
        places: &[
            demo("Colosseum", "historic", "archaeological_site", 41.8902, 12.4922, "Flavian amphitheatre in the centre of Rome."),
            demo("Pantheon", "historic", "building", 41.8986, 12.4769, "Former Roman temple, now a church."),
            demo("Trevi Fountain", "tourism", "attraction", 41.9009, 12.4833, "Baroque fountain in the Trevi district."),
            demo("Villa Borghese", "leisure", "park", 41.9145, 12.4923, "Landscape garden with museums."),
        ],
    },
    DemoRegion {
        name: "new-york",
        min_lat: 40.49,
        max_lat: 40.92,
        min_lon: -74.26,
        max_lon: -73.70,
        places: &[
            demo("Statue of Liberty", "tourism", "attraction", 40.6892, -74.0445, "Colossal statue on Liberty Island."),
            demo("Central Park", "leisure", "park", 40.7829, -73.9654, "Urban park in Manhattan."),
            demo("The Metropolitan Museum of Art", "tourism", "museum", 40.7794, -73.9632, "Largest art museum in the Americas."),
            demo("Strand Book Store", "shop", "books", 40.7332, -73.9907, "Independent bookstore near Union Square."),
        ],
    },
];

/// Serves a canned regional dataset instead of a message place.
///
/// The region is chosen by the request coordinate; requests outside every
/// known region get the default region's places.
#[derive(Debug, Clone)]
pub struct RegionalDemoFallback {
    regions: &'static [DemoRegion],
    default_region: usize,
}

impl Default for RegionalDemoFallback {
    fn default() -> Self {
        Self {
            regions: DEMO_REGIONS,
            default_region: 0,
        }
    }
}

impl RegionalDemoFallback {
    pub fn new(regions: &'static [DemoRegion], default_region: usize) -> Self {
        Self {
            regions,
            default_region: default_region.min(regions.len().saturating_sub(1)),
        }
    }

    pub fn region_for(&self, coord: &Coordinate) -> Option<&'static DemoRegion> {
        let regions: &'static [DemoRegion] = self.regions;
        regions
            .iter()
            .find(|r| r.contains(coord))
            .or_else(|| regions.get(self.default_region))
    }
}

impl FallbackStrategy for RegionalDemoFallback {
    fn name(&self) -> &'static str {
        "regional_demo"
    }

    fn fallback(&self, _reason: FallbackReason, request: &DiscoveryRequest) -> Vec<Place> {
        let Some(region) = self.region_for(&request.center) else {
            return InformationalFallback.fallback(FallbackReason::NoData, request);
        };

        let mut places: Vec<Place> = region
            .places
            .iter()
            .enumerate()
            .map(|(i, demo)| {
                let category = Category::from_tag(demo.key, demo.value).unwrap_or(Category::Generic);
                let mut place = Place::new(
                    format!("synthetic/demo/{}/{}", region.name, i + 1),
                    demo.name.to_string(),
                    category,
                    Location::at(Coordinate::new(demo.lat, demo.lon)),
                );
                place.description = demo.description.to_string();
                place
                    .tags
                    .insert(demo.key.to_string(), demo.value.to_string());
                place.tags.insert("name".to_string(), demo.name.to_string());
                place.measure_from(&request.center);
                place
            })
            .collect();

        places.sort_by_key(|p| p.distance);
        places.truncate(request.limit);
        places
    }
}
