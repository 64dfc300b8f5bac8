//! Bearings - nearby points of interest, grouped by compass direction.
//!
//! This library provides the discovery pipeline shared by the `query` server
//! and the `discover` command-line tool: Overpass query compilation,
//! endpoint failover, element normalization and direction-based views.

pub mod config;
pub mod direction;
pub mod discovery;
pub mod geodesy;
pub mod models;
pub mod normalize;
pub mod overpass;

pub use config::{Config, Overrides};
pub use direction::{ahead_of, filter_by_heading, group_by_direction, CardinalGroup};
pub use discovery::{Coordinator, Delivered, Discovery, DiscoveryError, DiscoveryRequest};
pub use geodesy::{Coordinate, Octant};
pub use models::{Category, Location, Place};
