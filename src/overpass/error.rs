use std::time::Duration;
use thiserror::Error;

use crate::geodesy::GeodesyError;

/// Rejected query input; always a caller bug
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<GeodesyError> for QueryError {
    fn from(err: GeodesyError) -> Self {
        QueryError::InvalidArgument(err.to_string())
    }
}

/// Failure of a single request against one endpoint
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Coarse classification used for logging and outcome reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    NetworkError,
    MalformedResponse,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Timeout(_) => FailureKind::Timeout,
            FetchError::Network(_) | FetchError::Status(_) => FailureKind::NetworkError,
            FetchError::Malformed(_) => FailureKind::MalformedResponse,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
