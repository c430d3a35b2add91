use std::time::Duration;

use thiserror::Error;

/// A JSON value that cannot be used as a discovery document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// A configured peer base that cannot be turned into a fetch URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeerUrlError {
    #[error("invalid peer base URL '{base}': {reason}")]
    Invalid { base: String, reason: String },

    #[error("peer base URL '{base}' uses unsupported scheme '{scheme}'")]
    UnsupportedScheme { base: String, scheme: String },

    #[error("peer base URL '{base}' uses plain http but insecure peers are not allowed")]
    InsecureScheme { base: String },
}

/// Why a single peer contributed nothing to a merge.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PeerFetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("responded with HTTP {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response body too large (limit {limit} bytes)")]
    BodyTooLarge { limit: usize },

    #[error("unusable document: {0}")]
    Document(#[from] DocumentError),
}
