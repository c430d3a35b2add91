pub mod document;
pub mod error;
pub mod fetcher;
pub mod peer;
pub mod service;

pub use document::DiscoveryDocument;
pub use error::{DocumentError, PeerFetchError, PeerUrlError};
pub use fetcher::PeerFetcher;
pub use peer::PeerEndpoint;
pub use service::{DEFAULT_PEER_TIMEOUT, DiscoveryService};
