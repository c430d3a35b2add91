use async_trait::async_trait;
use oada_http::{HttpClient, HttpError, TlsRootConfig, TransportSecurity};
use serde_json::Value;

use crate::config::{PeerTlsRoots, WellKnownConfig};
use crate::domain::{DiscoveryDocument, PeerEndpoint, PeerFetchError, PeerFetcher};

const USER_AGENT: &str = concat!("oada-well-known/", env!("CARGO_PKG_VERSION"));

/// Fetches peer documents over HTTP(S) with a shared pooled client.
#[derive(Clone)]
pub struct HttpPeerFetcher {
    client: HttpClient,
}

impl HttpPeerFetcher {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build a client from the module settings: request timeout, body limit
    /// and whether plain-http peers are reachable.
    ///
    /// # Errors
    /// Returns `HttpError` if the TLS stack cannot be initialized
    pub fn from_config(config: &WellKnownConfig) -> Result<Self, HttpError> {
        let transport = if config.allow_insecure_peers {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        };

        let client = HttpClient::builder()
            .timeout(config.peer_timeout())
            .max_body_size(config.max_peer_body_bytes)
            .user_agent(USER_AGENT)
            .transport(transport)
            .tls_roots(config.peer_tls_roots.into())
            .build()?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl PeerFetcher for HttpPeerFetcher {
    async fn fetch(&self, peer: &PeerEndpoint) -> Result<DiscoveryDocument, PeerFetchError> {
        let value: Value = self
            .client
            .get(peer.discovery_url())
            .header("accept", "application/json")
            .send()
            .await
            .map_err(map_http_error)?
            .json()
            .await
            .map_err(map_http_error)?;

        Ok(DiscoveryDocument::from_value(value)?)
    }
}

impl From<PeerTlsRoots> for TlsRootConfig {
    fn from(roots: PeerTlsRoots) -> Self {
        match roots {
            PeerTlsRoots::Webpki => Self::WebPki,
            PeerTlsRoots::Native => Self::Native,
        }
    }
}

fn map_http_error(err: HttpError) -> PeerFetchError {
    match err {
        HttpError::Timeout(after) => PeerFetchError::Timeout(after),
        HttpError::HttpStatus { status, .. } => PeerFetchError::Status {
            status: status.as_u16(),
        },
        HttpError::Json(e) => PeerFetchError::InvalidJson(e),
        HttpError::BodyTooLarge { limit, .. } => PeerFetchError::BodyTooLarge { limit },
        other => PeerFetchError::Transport(Box::new(other)),
    }
}
