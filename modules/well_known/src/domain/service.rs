use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use super::document::DiscoveryDocument;
use super::error::PeerFetchError;
use super::fetcher::PeerFetcher;
use super::peer::PeerEndpoint;

/// Default bound on a single peer fetch; `peer_timeout_secs` defaults to it.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the discovery document served to clients.
///
/// Holds the immutable base document and the ordered peer list. Each call to
/// [`discovery_document`](Self::discovery_document) starts from a fresh copy
/// of the base, so concurrent requests never share a result.
#[derive(Clone)]
pub struct DiscoveryService {
    base: Arc<DiscoveryDocument>,
    peers: Arc<[PeerEndpoint]>,
    fetcher: Arc<dyn PeerFetcher>,
    peer_timeout: Duration,
}

impl DiscoveryService {
    #[must_use]
    pub fn new(
        base: DiscoveryDocument,
        peers: Vec<PeerEndpoint>,
        fetcher: Arc<dyn PeerFetcher>,
        peer_timeout: Duration,
    ) -> Self {
        Self {
            base: Arc::new(base),
            peers: peers.into(),
            fetcher,
            peer_timeout,
        }
    }

    #[must_use]
    pub fn base(&self) -> &DiscoveryDocument {
        &self.base
    }

    #[must_use]
    pub fn peers(&self) -> &[PeerEndpoint] {
        &self.peers
    }

    /// Base document with every reachable peer's document overlaid.
    ///
    /// All peers are fetched concurrently and every fetch settles before the
    /// merge. Successful documents are applied in configured peer order, so a
    /// later peer wins a key collision no matter which response arrived
    /// first. Failed peers are logged and contribute nothing.
    #[instrument(skip(self), fields(peers = self.peers.len()))]
    pub async fn discovery_document(&self) -> DiscoveryDocument {
        let mut merged = DiscoveryDocument::clone(&self.base);
        if self.peers.is_empty() {
            return merged;
        }

        let outcomes = join_all(self.peers.iter().map(|peer| self.fetch_bounded(peer))).await;

        let mut failed = 0usize;
        for (peer, outcome) in self.peers.iter().zip(outcomes) {
            match outcome {
                Ok(doc) => {
                    debug!(url = %peer.discovery_url(), keys = doc.len(), "merging peer document");
                    merged.overlay(doc);
                }
                Err(err) => {
                    failed += 1;
                    info!(url = %peer.discovery_url(), error = %err, "peer discovery document unavailable, skipping");
                }
            }
        }

        debug!(
            merged = self.peers.len() - failed,
            failed, "aggregated peer discovery documents"
        );
        merged
    }

    async fn fetch_bounded(&self, peer: &PeerEndpoint) -> Result<DiscoveryDocument, PeerFetchError> {
        match tokio::time::timeout(self.peer_timeout, self.fetcher.fetch(peer)).await {
            Ok(result) => result,
            Err(_) => Err(PeerFetchError::Timeout(self.peer_timeout)),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    enum Reply {
        Doc(Value, Duration),
        Fail,
        Hang,
    }

    /// Scripted peers keyed by base URL; counts settled fetches.
    struct ScriptedFetcher {
        replies: HashMap<String, Reply>,
        settled: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(replies: Vec<(&str, Reply)>) -> Arc<Self> {
            Arc::new(Self {
                replies: replies
                    .into_iter()
                    .map(|(k, v)| (k.to_owned(), v))
                    .collect(),
                settled: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PeerFetcher for ScriptedFetcher {
        async fn fetch(&self, peer: &PeerEndpoint) -> Result<DiscoveryDocument, PeerFetchError> {
            let result = match self.replies.get(peer.base()) {
                Some(Reply::Doc(value, delay)) => {
                    tokio::time::sleep(*delay).await;
                    DiscoveryDocument::from_value(value.clone()).map_err(Into::into)
                }
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(PeerFetchError::Status { status: 504 })
                }
                Some(Reply::Fail) | None => Err(PeerFetchError::Status { status: 500 }),
            };
            self.settled.fetch_add(1, Ordering::SeqCst);
            result
        }
    }

    fn peer(base: &str) -> PeerEndpoint {
        PeerEndpoint::parse(base, true).unwrap()
    }

    fn service(
        base: Value,
        peers: &[&str],
        fetcher: Arc<ScriptedFetcher>,
        timeout: Duration,
    ) -> DiscoveryService {
        DiscoveryService::new(
            DiscoveryDocument::from_value(base).unwrap(),
            peers.iter().map(|p| peer(p)).collect(),
            fetcher,
            timeout,
        )
    }

    #[tokio::test]
    async fn no_peers_returns_base() {
        let fetcher = ScriptedFetcher::new(vec![]);
        let svc = service(json!({"a": 1}), &[], fetcher.clone(), DEFAULT_PEER_TIMEOUT);

        assert_eq!(svc.discovery_document().await.into_value(), json!({"a": 1}));
        assert_eq!(fetcher.settled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_peer_is_fetched_once() {
        let fetcher = ScriptedFetcher::new(vec![
            ("http://a", Reply::Doc(json!({"a": true}), Duration::ZERO)),
            ("http://b", Reply::Fail),
            ("http://c", Reply::Doc(json!({"c": true}), Duration::from_millis(20))),
        ]);
        let svc = service(
            json!({}),
            &["http://a", "http://b", "http://c"],
            fetcher.clone(),
            DEFAULT_PEER_TIMEOUT,
        );

        let doc = svc.discovery_document().await;

        assert_eq!(fetcher.settled.load(Ordering::SeqCst), 3);
        assert_eq!(doc.into_value(), json!({"a": true, "c": true}));
    }

    #[tokio::test]
    async fn later_configured_peer_wins_even_when_it_answers_first() {
        let fetcher = ScriptedFetcher::new(vec![
            ("http://slow", Reply::Doc(json!({"k": "slow"}), Duration::from_millis(150))),
            ("http://fast", Reply::Doc(json!({"k": "fast"}), Duration::ZERO)),
        ]);

        let svc = service(
            json!({"k": "base"}),
            &["http://slow", "http://fast"],
            fetcher.clone(),
            DEFAULT_PEER_TIMEOUT,
        );
        assert_eq!(svc.discovery_document().await.get("k"), Some(&json!("fast")));

        let svc = service(
            json!({"k": "base"}),
            &["http://fast", "http://slow"],
            fetcher,
            DEFAULT_PEER_TIMEOUT,
        );
        assert_eq!(svc.discovery_document().await.get("k"), Some(&json!("slow")));
    }

    #[tokio::test]
    async fn hung_peer_times_out_and_is_skipped() {
        let fetcher = ScriptedFetcher::new(vec![
            (
                "http://a",
                Reply::Doc(json!({"services": ["bookmarks", "jobs"]}), Duration::ZERO),
            ),
            ("http://b", Reply::Hang),
        ]);
        let svc = service(
            json!({"oada-configuration": {"services": ["bookmarks"]}}),
            &["http://a", "http://b"],
            fetcher,
            Duration::from_millis(50),
        );

        let doc = svc.discovery_document().await;

        assert_eq!(
            doc.into_value(),
            json!({
                "oada-configuration": {"services": ["bookmarks"]},
                "services": ["bookmarks", "jobs"]
            })
        );
    }

    #[tokio::test]
    async fn base_is_not_mutated_by_merges() {
        let fetcher = ScriptedFetcher::new(vec![(
            "http://a",
            Reply::Doc(json!({"a": 2, "b": 2}), Duration::ZERO),
        )]);
        let svc = service(json!({"a": 1}), &["http://a"], fetcher, DEFAULT_PEER_TIMEOUT);

        let first = svc.discovery_document().await;
        let second = svc.discovery_document().await;

        assert_eq!(first, second);
        assert_eq!(svc.base().clone().into_value(), json!({"a": 1}));
    }

    #[tokio::test]
    async fn non_object_peer_document_is_skipped() {
        let fetcher = ScriptedFetcher::new(vec![(
            "http://a",
            Reply::Doc(json!(["not", "an", "object"]), Duration::ZERO),
        )]);
        let svc = service(json!({"a": 1}), &["http://a"], fetcher, DEFAULT_PEER_TIMEOUT);

        assert_eq!(svc.discovery_document().await.into_value(), json!({"a": 1}));
    }

    #[tokio::test]
    #[traced_test]
    async fn each_failed_peer_is_logged_once_with_its_url() {
        let fetcher = ScriptedFetcher::new(vec![
            ("http://ok", Reply::Doc(json!({"ok": true}), Duration::ZERO)),
            ("http://broken", Reply::Fail),
            ("http://hung", Reply::Hang),
        ]);
        let svc = service(
            json!({}),
            &["http://ok", "http://broken", "http://hung"],
            fetcher,
            Duration::from_millis(50),
        );

        svc.discovery_document().await;

        logs_assert(|lines: &[&str]| {
            let skipped: Vec<&&str> = lines
                .iter()
                .filter(|line| line.contains("peer discovery document unavailable"))
                .collect();
            if skipped.len() != 2 {
                return Err(format!("expected 2 skip lines, got {}", skipped.len()));
            }
            for url in [
                "http://broken/.well-known/oada-configuration",
                "http://hung/.well-known/oada-configuration",
            ] {
                if skipped.iter().filter(|line| line.contains(url)).count() != 1 {
                    return Err(format!("expected one skip line for {url}"));
                }
            }
            if skipped.iter().any(|line| line.contains("http://ok/")) {
                return Err("successful peer was logged as skipped".to_owned());
            }
            Ok(())
        });
    }
}
