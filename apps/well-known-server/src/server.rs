//! HTTP and HTTPS listeners for the discovery router.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::config::{CertsConfig, Protocol, ServerConfig};

/// Serve `router` until `shutdown` is cancelled.
///
/// TLS material is loaded before binding, so bad certificates fail startup
/// without ever opening the port.
///
/// # Errors
/// Returns an error if TLS material cannot be loaded, the address cannot be
/// bound, or the plain HTTP server fails
pub async fn serve(cfg: &ServerConfig, router: Router, shutdown: CancellationToken) -> Result<()> {
    match cfg.protocol {
        Protocol::Http => {
            let listener = bind(&cfg.bind_addr, cfg.protocol).await?;
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
                .context("HTTP server failed")
        }
        Protocol::Https => {
            let certs = cfg
                .certs
                .as_ref()
                .context("server.certs is required when server.protocol is https")?;
            let acceptor = TlsAcceptor::from(load_tls_config(certs)?);
            let listener = bind(&cfg.bind_addr, cfg.protocol).await?;
            serve_tls(listener, acceptor, router, shutdown).await;
            Ok(())
        }
    }
}

async fn bind(addr: &str, protocol: Protocol) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener
        .local_addr()
        .with_context(|| format!("failed to read local address of {addr}"))?;
    info!(addr = %local, protocol = protocol.as_str(), "well-known server listening");
    Ok(listener)
}

async fn serve_tls(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    router: Router,
    shutdown: CancellationToken,
) {
    let connections = TaskTracker::new();

    loop {
        let (tcp, peer) = tokio::select! {
            () = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept TCP connection");
                    continue;
                }
            },
        };

        let acceptor = acceptor.clone();
        let router = router.clone();
        let shutdown = shutdown.clone();

        connections.spawn(async move {
            let tls = match acceptor.accept(tcp).await {
                Ok(tls) => tls,
                Err(e) => {
                    debug!(%peer, error = %e, "TLS handshake failed");
                    return;
                }
            };

            let builder = auto::Builder::new(TokioExecutor::new());
            let conn = builder
                .serve_connection_with_upgrades(TokioIo::new(tls), TowerToHyperService::new(router));
            tokio::pin!(conn);

            let result = tokio::select! {
                res = conn.as_mut() => res,
                () = shutdown.cancelled() => {
                    conn.as_mut().graceful_shutdown();
                    conn.as_mut().await
                }
            };
            if let Err(e) = result {
                debug!(%peer, error = %e, "connection closed with error");
            }
        });
    }

    connections.close();
    connections.wait().await;
    info!("HTTPS listener stopped");
}

/// Build a server TLS config from the PEM certificate chain and private key.
///
/// # Errors
/// Returns an error if either file is unreadable, holds no usable PEM item,
/// or the key does not match the certificate
pub fn load_tls_config(certs: &CertsConfig) -> Result<Arc<rustls::ServerConfig>> {
    let chain = load_cert_chain(&certs.cert_path)?;
    let key = PrivateKeyDer::from_pem_file(&certs.key_path)
        .with_context(|| format!("failed to read private key {}", certs.key_path.display()))?;

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let mut config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .context("failed to select TLS protocol versions")?
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .context("certificate and private key do not form a valid identity")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

fn load_cert_chain(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let chain = CertificateDer::pem_file_iter(path)
        .with_context(|| format!("failed to open certificate {}", path.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to parse certificate {}", path.display()))?;
    if chain.is_empty() {
        bail!("no certificates found in {}", path.display());
    }
    Ok(chain)
}
