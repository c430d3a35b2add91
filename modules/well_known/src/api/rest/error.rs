use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use oada_errors::{ErrorKind, OadaError};

/// Render `err` as an error document whose `instance` is the request path.
///
/// Every error the router produces goes through here.
pub fn error_response(err: OadaError, uri: &Uri) -> Response {
    if err.kind == ErrorKind::Internal {
        tracing::error!(error = %err, path = uri.path(), "request failed with internal error");
    }
    err.to_body().with_instance(uri.path()).into_response()
}

/// Fallback for every unmatched route.
pub async fn not_found(uri: Uri) -> Response {
    error_response(OadaError::not_found(format!("Route not found: {uri}")), &uri)
}

/// Fallback for a known path reached with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    let err = OadaError::new(
        ErrorKind::MethodNotAllowed,
        format!("Method {method} not allowed on {}", uri.path()),
    );
    error_response(err, &uri)
}
