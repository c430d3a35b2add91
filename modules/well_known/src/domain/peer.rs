use url::Url;

use super::error::PeerUrlError;
use crate::WELL_KNOWN_PATH;

/// A peer service whose discovery document is merged into ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEndpoint {
    base: String,
    discovery_url: String,
}

impl PeerEndpoint {
    /// Validate a configured `base` and derive the peer's discovery URL.
    ///
    /// `base` must be an absolute `http` or `https` URL with a host. Trailing
    /// slashes are dropped before the well-known path is appended.
    ///
    /// # Errors
    /// Returns `PeerUrlError` if `base` does not parse, has no host, uses
    /// another scheme, or uses `http` while `allow_insecure` is false
    pub fn parse(base: &str, allow_insecure: bool) -> Result<Self, PeerUrlError> {
        let url = Url::parse(base).map_err(|e| PeerUrlError::Invalid {
            base: base.to_owned(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "https" => {}
            "http" if allow_insecure => {}
            "http" => {
                return Err(PeerUrlError::InsecureScheme {
                    base: base.to_owned(),
                });
            }
            other => {
                return Err(PeerUrlError::UnsupportedScheme {
                    base: base.to_owned(),
                    scheme: other.to_owned(),
                });
            }
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(PeerUrlError::Invalid {
                base: base.to_owned(),
                reason: "missing host".to_owned(),
            });
        }

        let trimmed = base.trim_end_matches('/');
        Ok(Self {
            base: trimmed.to_owned(),
            discovery_url: format!("{trimmed}{WELL_KNOWN_PATH}"),
        })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}/.well-known/oada-configuration`
    #[must_use]
    pub fn discovery_url(&self) -> &str {
        &self.discovery_url
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn appends_well_known_path() {
        let peer = PeerEndpoint::parse("http://auth", true).unwrap();
        assert_eq!(peer.base(), "http://auth");
        assert_eq!(peer.discovery_url(), "http://auth/.well-known/oada-configuration");
    }

    #[test]
    fn trailing_slashes_do_not_double_up() {
        let peer = PeerEndpoint::parse("https://example.org/oada/", false).unwrap();
        assert_eq!(
            peer.discovery_url(),
            "https://example.org/oada/.well-known/oada-configuration"
        );
    }

    #[test]
    fn plain_http_needs_insecure_allowed() {
        assert_eq!(
            PeerEndpoint::parse("http://jobs:8080", false),
            Err(PeerUrlError::InsecureScheme {
                base: "http://jobs:8080".to_owned()
            })
        );
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(matches!(
            PeerEndpoint::parse("ftp://files", true),
            Err(PeerUrlError::UnsupportedScheme { scheme, .. }) if scheme == "ftp"
        ));
    }

    #[test]
    fn relative_and_garbage_bases_are_rejected() {
        assert!(matches!(
            PeerEndpoint::parse("auth", true),
            Err(PeerUrlError::Invalid { .. })
        ));
        assert!(matches!(
            PeerEndpoint::parse("", true),
            Err(PeerUrlError::Invalid { .. })
        ));
    }
}
