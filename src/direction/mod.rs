//! Direction-based views over a place list: compass "radar" buckets and
//! the heading-constrained "what's ahead" filter.

mod grouping;
mod orientation;

pub use grouping::{group_by_direction, CardinalGroup};
pub use orientation::{ahead_of, filter_by_heading, within_heading, DEFAULT_TOLERANCE_DEG};
