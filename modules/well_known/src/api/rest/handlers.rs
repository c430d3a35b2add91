use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, Uri, header};
use axum::response::{IntoResponse, Response};
use oada_errors::OadaError;

use super::error::error_response;
use crate::OADA_CONFIGURATION_CONTENT_TYPE;
use crate::domain::DiscoveryService;

/// `GET /.well-known/oada-configuration`
///
/// Waits for every peer fetch to settle, then returns the merged document.
pub async fn get_oada_configuration(
    State(service): State<Arc<DiscoveryService>>,
    uri: Uri,
) -> Response {
    let document = service.discovery_document().await;

    let body = match serde_json::to_vec(&document) {
        Ok(body) => body,
        Err(e) => {
            let err = OadaError::internal(format!("failed to serialize discovery document: {e}"));
            return error_response(err, &uri);
        }
    };

    let mut response = body.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(OADA_CONFIGURATION_CONTENT_TYPE),
    );
    response
}

