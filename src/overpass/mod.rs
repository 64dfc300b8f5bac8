//! Overpass API plumbing: query compilation, endpoint list and transport.

mod endpoint;
mod error;
mod query;
mod transport;

pub use endpoint::{default_endpoints, Endpoint, DEFAULT_ENDPOINTS};
pub use error::{FailureKind, FetchError, QueryError};
pub use query::{
    compile_query, sanitize_term, QueryRequest, TagFilter, DEFAULT_RADIUS_M,
    DEFAULT_SERVER_TIMEOUT_SECS, TAXONOMY,
};
pub use transport::{HttpTransport, Transport, TransportResponse};
