#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Outbound HTTP client for OADA services
//!
//! A hyper-based client built from a small tower stack:
//! - TLS via rustls, with `WebPki` or OS-native roots
//! - Connection pooling
//! - Per-request timeout
//! - User-Agent header injection
//! - Transparent response decompression (gzip, brotli, deflate)
//!
//! Requests are sent once. There is no retry and no redirect following; a
//! failed request is reported to the caller as an [`HttpError`].
//!
//! Body size limits apply to **decompressed** bytes.
//!
//! # Example
//!
//! ```ignore
//! use oada_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(5))
//!     .user_agent("well-known/0.1")
//!     .build()?;
//!
//! let doc: serde_json::Value = client
//!     .get("https://auth.example.com/.well-known/oada-configuration")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{
    DEFAULT_USER_AGENT, ERROR_BODY_PREVIEW_LIMIT, HttpClientConfig, TlsRootConfig,
    TransportSecurity,
};
pub use error::{HttpError, InvalidUriKind};
pub use layers::UserAgentLayer;
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody};
