//! TOML configuration shared by both binaries.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::discovery::{
    Coordinator, DiscoverySettings, FallbackStrategy, InformationalFallback,
    RegionalDemoFallback,
};
use crate::normalize::Normalizer;
use crate::overpass::{default_endpoints, Endpoint, HttpTransport, DEFAULT_SERVER_TIMEOUT_SECS};

pub const DEFAULT_USER_AGENT: &str = concat!("bearings/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
}

/// Which fallback strategy to use when no real data is available
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum FallbackKind {
    #[default]
    Informational,
    RegionalDemo,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub endpoints: Vec<Endpoint>,
    /// Empty string disables the connectivity probe
    pub probe_url: String,
    pub probe_timeout_secs: u64,
    pub attempt_timeout_secs: u64,
    pub backoff_secs: u64,
    pub server_timeout_secs: u32,
    pub user_agent: String,
    pub fallback: FallbackKind,
    /// Preferred `name:<lang>` variant
    pub language: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        let settings = DiscoverySettings::default();
        Self {
            endpoints: default_endpoints(),
            probe_url: settings.probe_url.unwrap_or_default(),
            probe_timeout_secs: settings.probe_timeout.as_secs(),
            attempt_timeout_secs: settings.attempt_timeout.as_secs(),
            backoff_secs: settings.backoff.as_secs(),
            server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fallback: FallbackKind::default(),
            language: None,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces the configured endpoint list when non-empty
    pub endpoints: Vec<String>,
    pub fallback: Option<FallbackKind>,
    pub language: Option<String>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides and re-validate
    pub fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if !overrides.endpoints.is_empty() {
            self.discovery.endpoints = overrides
                .endpoints
                .iter()
                .map(|raw| -> Result<Endpoint> {
                    let url = Url::parse(raw)
                        .with_context(|| format!("Invalid endpoint URL '{}'", raw))?;
                    let name = url.host_str().unwrap_or(raw.as_str()).to_string();
                    Ok(Endpoint::new(name, raw.as_str()))
                })
                .collect::<Result<_>>()?;
        }
        if let Some(fallback) = overrides.fallback {
            self.discovery.fallback = fallback;
        }
        if let Some(language) = overrides.language {
            self.discovery.language = Some(language).filter(|l| !l.is_empty());
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.discovery;
        if d.endpoints.is_empty() {
            bail!("At least one endpoint must be configured");
        }
        for endpoint in &d.endpoints {
            Url::parse(&endpoint.url)
                .with_context(|| format!("Invalid URL for endpoint '{}'", endpoint.name))?;
        }
        if !d.probe_url.is_empty() {
            Url::parse(&d.probe_url).context("Invalid probe URL")?;
        }
        if d.probe_timeout_secs == 0 {
            bail!("probe_timeout_secs must be positive");
        }
        if d.attempt_timeout_secs == 0 {
            bail!("attempt_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn settings(&self) -> DiscoverySettings {
        let d = &self.discovery;
        DiscoverySettings {
            endpoints: d.endpoints.clone(),
            probe_url: Some(d.probe_url.clone()).filter(|u| !u.is_empty()),
            probe_timeout: Duration::from_secs(d.probe_timeout_secs),
            attempt_timeout: Duration::from_secs(d.attempt_timeout_secs),
            backoff: Duration::from_secs(d.backoff_secs),
            server_timeout_secs: d.server_timeout_secs,
        }
    }

    pub fn fallback_strategy(&self) -> Arc<dyn FallbackStrategy> {
        match self.discovery.fallback {
            FallbackKind::Informational => Arc::new(InformationalFallback),
            FallbackKind::RegionalDemo => Arc::new(RegionalDemoFallback::default()),
        }
    }

    /// Wire up a coordinator backed by the real HTTP transport
    pub fn build_coordinator(&self) -> Result<Coordinator> {
        self.validate()?;
        let transport = HttpTransport::new(&self.discovery.user_agent)
            .context("Failed to create HTTP transport")?;
        Ok(Coordinator::new(Arc::new(transport), self.settings())
            .with_fallback(self.fallback_strategy())
            .with_normalizer(Normalizer::with_language(self.discovery.language.clone())))
    }
}
