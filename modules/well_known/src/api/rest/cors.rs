use axum::http::HeaderName;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Any origin, method and request header; exposes the configured headers.
///
/// Unparseable header names are skipped with a warning.
pub fn build_cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let exposed: Vec<HeaderName> = cfg
        .exposed_headers
        .iter()
        .filter_map(|name| match name.parse() {
            Ok(header) => Some(header),
            Err(_) => {
                warn!(header = %name, "ignoring invalid CORS exposed header");
                None
            }
        })
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(exposed);

    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(std::time::Duration::from_secs(cfg.max_age_seconds));
    }

    layer
}
