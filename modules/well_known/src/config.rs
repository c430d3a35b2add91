use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    DEFAULT_PEER_TIMEOUT, DiscoveryDocument, DocumentError, PeerEndpoint, PeerUrlError,
};

/// Configuration for the `well_known` module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WellKnownConfig {
    /// Base discovery document. Required; must be a JSON object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oada_configuration: Option<serde_json::Value>,

    /// Peer services whose documents are merged in, in this order.
    ///
    /// Skipped when empty so a serialized default layer never collides with
    /// the `mergeSubServices` spelling of a later layer.
    #[serde(
        default,
        alias = "mergeSubServices",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub merge_sub_services: Vec<SubService>,

    #[serde(default = "default_peer_timeout_secs")]
    pub peer_timeout_secs: u64,

    #[serde(default = "default_max_peer_body_bytes")]
    pub max_peer_body_bytes: usize,

    /// Permit `http://` peer bases.
    #[serde(default = "default_allow_insecure_peers")]
    pub allow_insecure_peers: bool,

    /// Trust anchors for `https://` peers.
    #[serde(default)]
    pub peer_tls_roots: PeerTlsRoots,

    #[serde(default)]
    pub cors: CorsConfig,
}

/// A peer entry. Fields other than `base` are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubService {
    pub base: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerTlsRoots {
    /// Bundled Mozilla roots
    #[default]
    Webpki,
    /// The host's certificate store, e.g. for peers signed by a private CA
    Native,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default = "default_exposed_headers")]
    pub exposed_headers: Vec<String>,
    /// Preflight cache lifetime; 0 leaves `Access-Control-Max-Age` unset.
    #[serde(default)]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            exposed_headers: default_exposed_headers(),
            max_age_seconds: 0,
        }
    }
}

impl Default for WellKnownConfig {
    fn default() -> Self {
        Self {
            oada_configuration: None,
            merge_sub_services: Vec::new(),
            peer_timeout_secs: default_peer_timeout_secs(),
            max_peer_body_bytes: default_max_peer_body_bytes(),
            allow_insecure_peers: default_allow_insecure_peers(),
            peer_tls_roots: PeerTlsRoots::default(),
            cors: CorsConfig::default(),
        }
    }
}

fn default_peer_timeout_secs() -> u64 {
    DEFAULT_PEER_TIMEOUT.as_secs()
}

fn default_max_peer_body_bytes() -> usize {
    1024 * 1024
}

fn default_allow_insecure_peers() -> bool {
    true
}

fn default_exposed_headers() -> Vec<String> {
    vec!["x-oada-rev".to_owned(), "location".to_owned()]
}

/// Startup configuration problems. All of them are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("well_known.oada_configuration is missing")]
    MissingBaseDocument,

    #[error("well_known.oada_configuration: {0}")]
    InvalidBaseDocument(#[from] DocumentError),

    #[error("well_known.merge_sub_services[{index}]: {source}")]
    InvalidPeer {
        index: usize,
        #[source]
        source: PeerUrlError,
    },

    #[error("well_known.peer_timeout_secs must be greater than zero")]
    ZeroPeerTimeout,
}

impl WellKnownConfig {
    /// The validated base document.
    ///
    /// # Errors
    /// Returns `ConfigError` if the document is missing or not an object
    pub fn base_document(&self) -> Result<DiscoveryDocument, ConfigError> {
        let value = self
            .oada_configuration
            .clone()
            .ok_or(ConfigError::MissingBaseDocument)?;
        Ok(DiscoveryDocument::from_value(value)?)
    }

    /// The validated peer list, in configured order.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidPeer` for the first unusable entry
    pub fn peers(&self) -> Result<Vec<PeerEndpoint>, ConfigError> {
        self.merge_sub_services
            .iter()
            .enumerate()
            .map(|(index, s)| {
                PeerEndpoint::parse(&s.base, self.allow_insecure_peers)
                    .map_err(|source| ConfigError::InvalidPeer { index, source })
            })
            .collect()
    }

    #[must_use]
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }

    /// Check everything the module needs at startup.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_document()?;
        self.peers()?;
        if self.peer_timeout_secs == 0 {
            return Err(ConfigError::ZeroPeerTimeout);
        }
        Ok(())
    }
}
