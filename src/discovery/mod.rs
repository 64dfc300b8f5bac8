//! Discovery: turn an observer position into a list of places despite
//! unreliable Overpass servers.
//!
//! The [`Coordinator`] probes connectivity, tries each configured endpoint
//! in order with a fixed courtesy delay between attempts, and hands any
//! terminal failure to a [`FallbackStrategy`] so callers always receive
//! something renderable.

mod coordinator;
mod fallback;
mod sleeper;

pub use coordinator::{
    Coordinator, Delivered, Discovery, DiscoveryError, DiscoveryRequest, DiscoverySettings,
    DEFAULT_LIMIT,
};
pub use fallback::{
    DemoPlace, DemoRegion, FallbackReason, FallbackStrategy, InformationalFallback,
    RegionalDemoFallback, DEMO_REGIONS, NO_CONNECTIVITY_ID, NO_DATA_ID, SERVERS_UNAVAILABLE_ID,
};
pub use sleeper::{Sleeper, TokioSleeper};
