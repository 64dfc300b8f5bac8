//! Overpass QL query compilation.
//!
//! Output is a fixed wire format:
//! `[out:json][timeout:N];(<stmt>(around:R,LAT,LON);...);out geom;`
//! with coordinates always printed with six decimals and a dot separator.

use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

use super::QueryError;
use crate::geodesy::Coordinate;

pub const DEFAULT_RADIUS_M: u32 = 1000;

/// Value of the `[timeout:N]` setting sent to the server
pub const DEFAULT_SERVER_TIMEOUT_SECS: u32 = 25;

/// One tag filter of the POI taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilter {
    /// `["key"]`
    Any(&'static str),
    /// `["key"~"^(a|b|c)$"]`
    OneOf(&'static str, &'static [&'static str]),
}

impl TagFilter {
    fn render(&self) -> String {
        match self {
            TagFilter::Any(key) => format!("[\"{}\"]", key),
            TagFilter::OneOf(key, values) => format!("[\"{}\"~\"^({})$\"]", key, values.join("|")),
        }
    }
}

/// The tag families queried when no search term is given
pub const TAXONOMY: &[TagFilter] = &[
    TagFilter::Any("tourism"),
    TagFilter::Any("historic"),
    TagFilter::OneOf(
        "amenity",
        &[
            "restaurant", "cafe", "bar", "pub", "fast_food", "museum", "theatre", "cinema",
            "library", "hospital", "pharmacy", "bank", "atm", "fuel", "parking", "toilets",
            "school",
        ],
    ),
    TagFilter::OneOf(
        "leisure",
        &[
            "park", "garden", "playground", "sports_centre", "swimming_pool", "golf_course",
            "marina",
        ],
    ),
    TagFilter::OneOf(
        "shop",
        &[
            "mall", "supermarket", "convenience", "books", "clothes", "electronics", "gifts",
            "jewelry", "art", "bakery", "butcher",
        ],
    ),
];

const ELEMENT_KINDS: [&str; 2] = ["node", "way"];

static QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"["'`\\]"#).unwrap());
static REGEX_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.*+?^$()\[\]{}|]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Discovery query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub center: Coordinate,
    pub radius_m: u32,
    pub term: Option<String>,
}

impl QueryRequest {
    pub fn new(center: Coordinate) -> Self {
        Self {
            center,
            radius_m: DEFAULT_RADIUS_M,
            term: None,
        }
    }

    pub fn radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        self.center.validate()?;
        if self.radius_m == 0 {
            return Err(QueryError::InvalidArgument(
                "radius must be a positive number of meters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Make a free-text term safe to embed in a quoted Overpass regex.
///
/// Quotes and backslashes are removed, regex metacharacters match any
/// character, whitespace is collapsed. Returns `None` when nothing is left.
pub fn sanitize_term(term: &str) -> Option<String> {
    let term = QUOTES.replace_all(term, "");
    let term = REGEX_META.replace_all(&term, ".");
    let term = WHITESPACE.replace_all(term.trim(), " ");
    if term.is_empty() {
        None
    } else {
        Some(term.into_owned())
    }
}

/// Compile a request into an Overpass QL query string
pub fn compile_query(request: &QueryRequest, server_timeout_secs: u32) -> Result<String, QueryError> {
    request.validate()?;

    let around = format!(
        "(around:{},{:.6},{:.6});",
        request.radius_m, request.center.lat, request.center.lon
    );

    let filters: Vec<String> = match request.term.as_deref().and_then(sanitize_term) {
        Some(term) => vec![format!("[\"name\"~\"{}\",i]", term)],
        None => TAXONOMY.iter().map(TagFilter::render).collect(),
    };

    let mut query = format!("[out:json][timeout:{}];(", server_timeout_secs);
    for filter in &filters {
        for kind in ELEMENT_KINDS {
            // Writing into a String cannot fail
            let _ = write!(query, "{}{}{}", kind, filter, around);
        }
    }
    query.push_str(");out geom;");

    Ok(query)
}
