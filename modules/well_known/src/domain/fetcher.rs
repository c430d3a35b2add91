use async_trait::async_trait;

use super::document::DiscoveryDocument;
use super::error::PeerFetchError;
use super::peer::PeerEndpoint;

/// Retrieves a peer's discovery document.
///
/// Implementations report every failure as a `PeerFetchError` and never
/// retry. The caller bounds each call with its own timeout.
#[async_trait]
pub trait PeerFetcher: Send + Sync {
    async fn fetch(&self, peer: &PeerEndpoint) -> Result<DiscoveryDocument, PeerFetchError>;
}
