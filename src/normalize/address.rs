//! Postal address synthesis from `addr:*` tags.

use std::collections::HashMap;

fn tag<'a>(tags: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// "number street", or the street alone; empty without a street
pub fn street_line(tags: &HashMap<String, String>) -> String {
    match (tag(tags, "addr:housenumber"), tag(tags, "addr:street")) {
        (Some(number), Some(street)) => format!("{} {}", number, street),
        (None, Some(street)) => street.to_string(),
        _ => String::new(),
    }
}

/// Street line followed by "postcode city" (or city alone), joined with ", "
pub fn synthesize_address(tags: &HashMap<String, String>) -> String {
    let mut parts = Vec::new();

    let street = street_line(tags);
    if !street.is_empty() {
        parts.push(street);
    }

    match (tag(tags, "addr:postcode"), tag(tags, "addr:city")) {
        (Some(postcode), Some(city)) => parts.push(format!("{} {}", postcode, city)),
        (None, Some(city)) => parts.push(city.to_string()),
        _ => {}
    }

    parts.join(", ")
}
