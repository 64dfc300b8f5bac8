use crate::discovery::Discovery;
use crate::geodesy::{normalize_degrees, Coordinate};
use crate::models::Place;

/// Half-width of the "ahead" cone when the caller does not choose one
pub const DEFAULT_TOLERANCE_DEG: f64 = 45.0;

/// Whether `bearing` lies within `tolerance` degrees of `heading`,
/// across the 0°/360° seam.
pub fn within_heading(bearing: f64, heading: f64, tolerance: f64) -> bool {
    let tolerance = tolerance.clamp(0.0, 180.0);
    let diff = normalize_degrees(bearing - heading);
    diff <= tolerance || diff >= 360.0 - tolerance
}

/// Keep the places lying within `tolerance` of `heading` as seen from
/// `observer`, nearest first.
///
/// Distances are re-measured from `observer`. Sorting is stable, so places
/// at the same distance keep their input order.
pub fn filter_by_heading(
    places: &[Place],
    observer: &Coordinate,
    heading: f64,
    tolerance: f64,
) -> Vec<Place> {
    let mut ahead: Vec<Place> = places
        .iter()
        .filter(|place| {
            let target = place.coordinate();
            target.validate().is_ok() && within_heading(observer.bearing_to(&target), heading, tolerance)
        })
        .cloned()
        .map(|mut place| {
            place.measure_from(observer);
            place
        })
        .collect();

    ahead.sort_by_key(|p| p.distance);
    ahead
}

/// The heading view of a whole discovery.
///
/// Fallback placeholders are in-band status messages rather than places
/// with a meaningful bearing, so they are returned untouched.
pub fn ahead_of(
    discovery: &Discovery,
    observer: &Coordinate,
    heading: f64,
    tolerance: f64,
) -> Vec<Place> {
    if !discovery.is_real() && discovery.places.iter().all(Place::is_synthetic) {
        return discovery.places.clone();
    }
    filter_by_heading(&discovery.places, observer, heading, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{
        Delivered, DiscoveryRequest, FallbackReason, FallbackStrategy, InformationalFallback,
        NO_CONNECTIVITY_ID,
    };
    use crate::models::{Category, Location};
    use proptest::prelude::*;

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
    fn test_within_heading_wraps() {
        assert!(within_heading(350.0, 10.0, 45.0));
        assert!(within_heading(10.0, 350.0, 45.0));
        assert!(within_heading(55.0, 10.0, 45.0));
        assert!(!within_heading(56.0, 10.0, 45.0));
        assert!(!within_heading(180.0, 0.0, 45.0));
        assert!(within_heading(123.0, 0.0, 180.0));
    }

    #[test]
    fn test_filter_north_sorted_by_distance() {
        let places = vec![
            place("far-north", 0.05, 0.0),
            place("south", -0.01, 0.0),
            place("near-north-west", 0.01, -0.002),
            place("east", 0.0, 0.01),
        ];
        let ahead = filter_by_heading(&places, &ORIGIN, 0.0, DEFAULT_TOLERANCE_DEG);
        let ids: Vec<&str> = ahead.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near-north-west", "far-north"]);
        assert!(ahead[0].distance < ahead[1].distance);
    }

    #[test]
    fn test_filter_across_seam() {
        let places = vec![place("nnw", 0.01, -0.002), place("nne", 0.01, 0.002)];
        let ahead = filter_by_heading(&places, &ORIGIN, 355.0, 20.0);
        assert_eq!(ahead.len(), 2);
    }

    #[test]
    fn test_distance_remeasured_from_observer() {
        let mut p = place("north", 0.01, 0.0);
        p.distance = 999_999;
        let ahead = filter_by_heading(&[p], &ORIGIN, 0.0, 10.0);
        assert_eq!(ahead[0].distance, 1111);
    }

    #[test]
    fn test_ahead_keeps_fallback_message_for_any_heading() {
        let request = DiscoveryRequest::new(ORIGIN);
        let discovery = Discovery {
            outcome: Delivered::Fallback {
                reason: FallbackReason::NoConnectivity,
            },
            places: InformationalFallback.fallback(FallbackReason::NoConnectivity, &request),
        };

        for heading in [0.0, 90.0, 180.0, 270.0] {
            let ahead = ahead_of(&discovery, &ORIGIN, heading, DEFAULT_TOLERANCE_DEG);
            assert_eq!(ahead.len(), 1, "heading {}", heading);
            assert_eq!(ahead[0].id, NO_CONNECTIVITY_ID);
        }
    }

    #[test]
    fn test_ahead_filters_real_discovery() {
        let discovery = Discovery {
            outcome: Delivered::Real {
                endpoint: "primary".to_string(),
            },
            places: vec![place("north", 0.01, 0.0), place("south", -0.01, 0.0)],
        };
        let ahead = ahead_of(&discovery, &ORIGIN, 180.0, DEFAULT_TOLERANCE_DEG);
        let ids: Vec<&str> = ahead.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["south"]);
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(
            heading in 0.0f64..360.0,
            tolerance in 0.0f64..180.0,
            offsets in proptest::collection::vec((-0.05f64..0.05, -0.05f64..0.05), 0..30),
        ) {
            let places: Vec<Place> = offsets
                .iter()
                .enumerate()
                .map(|(i, (lat, lon))| place(&format!("p{}", i), *lat, *lon))
                .collect();
            let once = filter_by_heading(&places, &ORIGIN, heading, tolerance);
            let twice = filter_by_heading(&once, &ORIGIN, heading, tolerance);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_filter_output_sorted(
            heading in 0.0f64..360.0,
            offsets in proptest::collection::vec((-0.05f64..0.05, -0.05f64..0.05), 0..30),
        ) {
            let places: Vec<Place> = offsets
                .iter()
                .enumerate()
                .map(|(i, (lat, lon))| place(&format!("p{}", i), *lat, *lon))
                .collect();
            let ahead = filter_by_heading(&places, &ORIGIN, heading, DEFAULT_TOLERANCE_DEG);
            prop_assert!(ahead.windows(2).all(|w| w[0].distance <= w[1].distance));
        }
    }
}
