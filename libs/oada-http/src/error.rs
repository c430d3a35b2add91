use thiserror::Error;

/// Why a URL was rejected before any connection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// Not a URI at all
    ParseError,
    /// No host, e.g. `http:///path`
    MissingAuthority,
    /// Relative reference such as `/path` or `host/path`
    MissingScheme,
}

/// Everything that can go wrong between `get()` and a decoded body.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("could not assemble request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("bad header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("bad header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// No complete response within the configured request timeout.
    #[error("no response within {0:?}")]
    Timeout(std::time::Duration),

    /// DNS failure, refused or reset connection.
    #[error("connection failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("TLS initialization failed: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Decompressed body passed `max_body_size`. `actual` is the count at
    /// the point reading stopped.
    #[error("body exceeds {limit} bytes (read {actual})")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Non-2xx answer, raised by the checked body readers only.
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
        content_type: Option<String>,
    },

    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Every buffer slot is taken; the request was not queued.
    #[error("client overloaded: request buffer full")]
    Overloaded,

    #[error("client worker stopped")]
    ServiceClosed,

    #[error("invalid URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    /// `http` under [`TransportSecurity::TlsOnly`](crate::TransportSecurity::TlsOnly).
    #[error("scheme '{scheme}' refused: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}
