use serde::{Deserialize, Serialize};

/// Public Overpass interpreters, in the order they are tried
pub const DEFAULT_ENDPOINTS: &[(&str, &str)] = &[
    ("overpass-api.de", "https://overpass-api.de/api/interpreter"),
    ("kumi", "https://overpass.kumi.systems/api/interpreter"),
    ("private.coffee", "https://overpass.private.coffee/api/interpreter"),
];

/// A named Overpass interpreter URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

pub fn default_endpoints() -> Vec<Endpoint> {
    DEFAULT_ENDPOINTS
        .iter()
        .map(|(name, url)| Endpoint::new(*name, *url))
        .collect()
}
