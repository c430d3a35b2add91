use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;

use super::{cors, error, handlers, trace};
use crate::WELL_KNOWN_PATH;
use crate::config::CorsConfig;
use crate::domain::DiscoveryService;

/// Build the module router.
///
/// Layers, outermost first: `http_request` span, request logging, CORS. CORS
/// wraps the fallbacks too: it answers every `OPTIONS` request itself, on any
/// path, and error responses carry the CORS headers.
pub fn router(service: Arc<DiscoveryService>, cors_cfg: &CorsConfig) -> Router {
    Router::new()
        .route(
            WELL_KNOWN_PATH,
            get(handlers::get_oada_configuration).fallback(error::method_not_allowed),
        )
        .fallback(error::not_found)
        .with_state(service)
        .layer(cors::build_cors_layer(cors_cfg))
        .layer(from_fn(trace::log_request))
        .layer(trace::trace_layer())
}

