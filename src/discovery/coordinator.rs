//! Endpoint failover state machine.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{FallbackReason, FallbackStrategy, InformationalFallback, Sleeper, TokioSleeper};
use crate::geodesy::Coordinate;
use crate::models::{OverpassResponse, Place};
use crate::normalize::Normalizer;
use crate::overpass::{
    compile_query, default_endpoints, Endpoint, FetchError, QueryError, QueryRequest, Transport,
    DEFAULT_RADIUS_M, DEFAULT_SERVER_TIMEOUT_SECS,
};

pub const DEFAULT_LIMIT: usize = 20;

/// Errors that escape discovery; ordinary network failure never does
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiscoveryError {
    #[error(transparent)]
    InvalidArgument(#[from] QueryError),

    #[error("discovery cancelled")]
    Cancelled,
}

/// What the caller asked for
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryRequest {
    pub center: Coordinate,
    pub radius_m: u32,
    pub term: Option<String>,
    pub limit: usize,
}

impl DiscoveryRequest {
    pub fn new(center: Coordinate) -> Self {
        Self {
            center,
            radius_m: DEFAULT_RADIUS_M,
            term: None,
            limit: DEFAULT_LIMIT,
        }
    }

    fn query(&self) -> QueryRequest {
        QueryRequest {
            center: self.center,
            radius_m: self.radius_m,
            term: self.term.clone(),
        }
    }
}

/// How a discovery ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivered {
    Real { endpoint: String },
    Fallback { reason: FallbackReason },
}

/// Places delivered for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discovery {
    pub outcome: Delivered,
    pub places: Vec<Place>,
}

impl Discovery {
    pub fn is_real(&self) -> bool {
        matches!(self.outcome, Delivered::Real { .. })
    }
}

/// Timing and endpoint configuration for the coordinator
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySettings {
    /// Tried strictly in order
    pub endpoints: Vec<Endpoint>,
    /// Reachability probe; `None` skips the check
    pub probe_url: Option<String>,
    pub probe_timeout: Duration,
    pub attempt_timeout: Duration,
    pub backoff: Duration,
    pub server_timeout_secs: u32,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            probe_url: Some("https://overpass-api.de/api/status".to_string()),
            probe_timeout: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(30),
            backoff: Duration::from_secs(2),
            server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ConnectivityCheck,
    EndpointAttempt(usize),
    NextEndpoint(usize),
    AllFailed,
}

/// Result of one endpoint attempt
enum Attempt {
    Usable(Vec<Place>),
    Empty,
    Failed(FetchError),
}

/// Runs discovery requests against the ranked endpoint list.
///
/// Holds no per-request state; one coordinator can serve concurrent
/// requests.
#[derive(Clone)]
pub struct Coordinator {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    fallback: Arc<dyn FallbackStrategy>,
    normalizer: Normalizer,
    settings: DiscoverySettings,
}

impl Coordinator {
    pub fn new(transport: Arc<dyn Transport>, settings: DiscoverySettings) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            fallback: Arc::new(InformationalFallback),
            normalizer: Normalizer::new(),
            settings,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackStrategy>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn settings(&self) -> &DiscoverySettings {
        &self.settings
    }

    pub fn fallback_name(&self) -> &'static str {
        self.fallback.name()
    }

    /// Discover places around `request.center`.
    ///
    /// Returns real places, or the fallback strategy's places when nothing
    /// real could be fetched. Fails only on invalid input or cancellation.
    pub async fn discover(
        &self,
        request: &DiscoveryRequest,
        cancel: &CancellationToken,
    ) -> Result<Discovery, DiscoveryError> {
        let span = info_span!(
            "discover",
            request_id = %Uuid::new_v4(),
            lat = request.center.lat,
            lon = request.center.lon,
            radius = request.radius_m,
        );
        self.run(request, cancel).instrument(span).await
    }

    async fn run(
        &self,
        request: &DiscoveryRequest,
        cancel: &CancellationToken,
    ) -> Result<Discovery, DiscoveryError> {
        let query = compile_query(&request.query(), self.settings.server_timeout_secs)?;

        if request.limit == 0 {
            return Ok(Discovery {
                outcome: Delivered::Real {
                    endpoint: String::new(),
                },
                places: Vec::new(),
            });
        }

        if cancel.is_cancelled() {
            return Err(DiscoveryError::Cancelled);
        }

        let endpoints = &self.settings.endpoints;
        let mut answered = false;
        let mut state = State::ConnectivityCheck;

        loop {
            debug!(?state, "Discovery state");
            state = match state {
                State::ConnectivityCheck => match self.check_connectivity(cancel).await? {
                    Ok(()) => State::EndpointAttempt(0),
                    Err(e) => {
                        warn!("Connectivity probe failed: {}", e);
                        return Ok(self.degrade(FallbackReason::NoConnectivity, request));
                    }
                },
                State::EndpointAttempt(i) => {
                    let Some(endpoint) = endpoints.get(i) else {
                        break;
                    };
                    match self.attempt(endpoint, &query, request, cancel).await? {
                        Attempt::Usable(places) => {
                            info!(
                                "Endpoint {} delivered {} places",
                                endpoint.name,
                                places.len()
                            );
                            return Ok(Discovery {
                                outcome: Delivered::Real {
                                    endpoint: endpoint.name.clone(),
                                },
                                places,
                            });
                        }
                        Attempt::Empty => {
                            answered = true;
                            info!("Endpoint {} had no usable places", endpoint.name);
                            State::NextEndpoint(i + 1)
                        }
                        Attempt::Failed(e) => {
                            warn!(
                                kind = ?e.kind(),
                                "Endpoint {} failed (attempt {}/{}): {}",
                                endpoint.name,
                                i + 1,
                                endpoints.len(),
                                e
                            );
                            State::NextEndpoint(i + 1)
                        }
                    }
                }
                State::NextEndpoint(i) if i >= endpoints.len() => State::AllFailed,
                State::NextEndpoint(i) => {
                    self.cancellable(cancel, self.sleeper.sleep(self.settings.backoff))
                        .await?;
                    State::EndpointAttempt(i)
                }
                State::AllFailed => break,
            };
        }

        let reason = if answered {
            FallbackReason::NoData
        } else {
            FallbackReason::ServersUnavailable
        };
        warn!("All {} endpoints exhausted ({:?})", endpoints.len(), reason);
        Ok(self.degrade(reason, request))
    }

    async fn check_connectivity(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Result<(), FetchError>, DiscoveryError> {
        let Some(url) = self.settings.probe_url.as_deref() else {
            return Ok(Ok(()));
        };
        let timeout = self.settings.probe_timeout;
        let probe = async {
            match tokio::time::timeout(timeout, self.transport.probe(url, timeout)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            }
        };
        self.cancellable(cancel, probe).await
    }

    async fn attempt(
        &self,
        endpoint: &Endpoint,
        query: &str,
        request: &DiscoveryRequest,
        cancel: &CancellationToken,
    ) -> Result<Attempt, DiscoveryError> {
        let timeout = self.settings.attempt_timeout;
        let started = Instant::now();
        let call = async {
            match tokio::time::timeout(timeout, self.transport.execute(endpoint, query, timeout))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            }
        };
        let result = self.cancellable(cancel, call).await?;
        debug!(
            endpoint = %endpoint.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Endpoint attempt finished"
        );

        let response = match result {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Failed(e)),
        };

        if !response.is_success() {
            return Ok(Attempt::Failed(FetchError::Status(response.status)));
        }

        let parsed: OverpassResponse = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(Attempt::Failed(FetchError::Malformed(e.to_string()))),
        };

        if let Some(remark) = &parsed.remark {
            warn!("Endpoint {} remark: {}", endpoint.name, remark);
        }

        let mut places = self
            .normalizer
            .normalize_all(&parsed.elements, &request.center);
        debug!(
            "Endpoint {} returned {} elements, {} usable",
            endpoint.name,
            parsed.elements.len(),
            places.len()
        );

        if places.is_empty() {
            return Ok(Attempt::Empty);
        }

        places.sort_by_key(|p| p.distance);
        places.truncate(request.limit);
        Ok(Attempt::Usable(places))
    }

    fn degrade(&self, reason: FallbackReason, request: &DiscoveryRequest) -> Discovery {
        let places = self.fallback.fallback(reason, request);
        info!(
            "Delivering {} fallback places via {} ({:?})",
            places.len(),
            self.fallback.name(),
            reason
        );
        Discovery {
            outcome: Delivered::Fallback { reason },
            places,
        }
    }

    async fn cancellable<F: Future>(
        &self,
        cancel: &CancellationToken,
        fut: F,
    ) -> Result<F::Output, DiscoveryError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Discovery cancelled");
                Err(DiscoveryError::Cancelled)
            }
            out = fut => Ok(out),
        }
    }
}
