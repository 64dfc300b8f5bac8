//! Core data models for the discovery pipeline.

pub mod category;
pub mod element;
pub mod place;

pub use category::Category;
pub use element::{OverpassResponse, RawGeoElement, RawMember};
pub use place::{Location, OsmType, Place};
