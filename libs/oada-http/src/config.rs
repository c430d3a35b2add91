use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("oada-http/", env!("CARGO_PKG_VERSION"));

/// Bytes of a non-2xx body kept in `HttpError::HttpStatus::body_preview`.
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Where trust anchors for `https` peers come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Bundled Mozilla roots
    #[default]
    WebPki,
    /// Platform trust store, loaded once per process
    Native,
}

/// Which URL schemes a client may dial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    #[default]
    TlsOnly,
    /// `http` and `https`.
    ///
    /// Sub-services behind the same proxy are commonly reached over plain
    /// HTTP (`http://auth`, `http://jobs`), so the discovery service enables
    /// this unless told otherwise.
    AllowInsecureHttp,
}

/// Settings consumed by [`HttpClientBuilder`](crate::HttpClientBuilder).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Deadline for the whole exchange up to response headers.
    pub request_timeout: Duration,

    /// Cap on decompressed body bytes.
    pub max_body_size: usize,

    pub user_agent: String,

    pub transport: TransportSecurity,

    pub tls_roots: TlsRootConfig,

    /// Requests that may wait for the buffer worker before `Overloaded`.
    pub buffer_capacity: usize,

    /// `None` keeps hyper-util's default.
    pub pool_idle_timeout: Option<Duration>,

    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(15),
            max_body_size: 4 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::default(),
            buffer_capacity: 512,
            pool_idle_timeout: Some(Duration::from_secs(60)),
            pool_max_idle_per_host: 8,
        }
    }
}

impl HttpClientConfig {
    /// Short timeouts and plain `http`, for local mock servers.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024,
            transport: TransportSecurity::AllowInsecureHttp,
            buffer_capacity: 256,
            pool_idle_timeout: Some(Duration::from_secs(10)),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_is_tls_only() {
        let config = HttpClientConfig::default();
        assert_eq!(config.transport, TransportSecurity::TlsOnly);
        assert_eq!(config.tls_roots, TlsRootConfig::WebPki);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(config.user_agent.starts_with("oada-http/"));
    }

    #[test]
    fn testing_preset_allows_plain_http() {
        let config = HttpClientConfig::for_testing();
        assert_eq!(config.transport, TransportSecurity::AllowInsecureHttp);
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
