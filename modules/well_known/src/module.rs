use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::info;

use crate::api::rest;
use crate::config::{ConfigError, CorsConfig, WellKnownConfig};
use crate::domain::{DiscoveryService, PeerFetcher};
use crate::infra::HttpPeerFetcher;

#[derive(Error, Debug)]
pub enum WellKnownError {
    #[error("invalid well_known configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build peer HTTP client: {0}")]
    HttpClient(#[from] oada_http::HttpError),
}

/// The discovery responder: a validated configuration wired to its router.
#[derive(Clone)]
pub struct WellKnown {
    service: Arc<DiscoveryService>,
    cors: CorsConfig,
}

impl WellKnown {
    /// Validate `config` and fetch peers over HTTP.
    ///
    /// The configuration is checked before the client is built, so an invalid
    /// one is reported without a Tokio runtime. A valid one must be passed in
    /// from within a runtime, because the client spawns its buffer worker.
    ///
    /// # Errors
    /// Returns `WellKnownError` if the configuration is invalid or the HTTP
    /// client cannot be built
    pub fn from_config(config: &WellKnownConfig) -> Result<Self, WellKnownError> {
        config.validate()?;
        let fetcher = HttpPeerFetcher::from_config(config)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Validate `config` and fetch peers with `fetcher`.
    ///
    /// # Errors
    /// Returns `WellKnownError::Config` if the configuration is invalid
    pub fn with_fetcher(
        config: &WellKnownConfig,
        fetcher: Arc<dyn PeerFetcher>,
    ) -> Result<Self, WellKnownError> {
        config.validate()?;
        let base = config.base_document()?;
        let peers = config.peers()?;

        info!(
            base_keys = base.len(),
            peers = peers.len(),
            peer_timeout_secs = config.peer_timeout_secs,
            "well-known discovery configured"
        );

        let service = DiscoveryService::new(base, peers, fetcher, config.peer_timeout());
        Ok(Self {
            service: Arc::new(service),
            cors: config.cors.clone(),
        })
    }

    #[must_use]
    pub fn service(&self) -> &Arc<DiscoveryService> {
        &self.service
    }

    #[must_use]
    pub fn router(&self) -> Router {
        rest::router(Arc::clone(&self.service), &self.cors)
    }
}
