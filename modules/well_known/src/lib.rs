//! OADA well-known discovery module
//!
//! Serves `/.well-known/oada-configuration`: a base discovery document with
//! the documents of configured peer services overlaid at request time. Peer
//! failures are logged and skipped; the response always carries the base.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::{ConfigError, CorsConfig, PeerTlsRoots, SubService, WellKnownConfig};
pub use domain::{DiscoveryDocument, DiscoveryService, PeerEndpoint, PeerFetchError, PeerFetcher};
pub use module::{WellKnown, WellKnownError};

/// Path of the discovery document, on this service and on every peer.
pub const WELL_KNOWN_PATH: &str = "/.well-known/oada-configuration";

/// Content type of the discovery document.
pub const OADA_CONFIGURATION_CONTENT_TYPE: &str = "application/vnd.oada.oada-configuration.1+json";
