use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use axum::middleware::Next;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::field::Empty;
use tracing::{Span, info, trace};

/// Request logging before routing: one info line per request, headers at trace.
pub async fn log_request(req: Request, next: Next) -> Response<Body> {
    info!(method = %req.method(), uri = %req.uri(), "received request");
    trace!(headers = ?req.headers(), "request headers");
    next.run(req).await
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HttpRequestSpan;

impl<B> MakeSpan<B> for HttpRequestSpan {
    fn make_span(&mut self, req: &axum::http::Request<B>) -> Span {
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
            version = ?req.version(),
            module = "well_known",
            "user_agent.original" = req
                .headers()
                .get("user-agent")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("unknown"),
            status = Empty,
            latency_ms = Empty,
        )
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RecordStatus;

impl<B> OnResponse<B> for RecordStatus {
    fn on_response(self, res: &Response<B>, latency: std::time::Duration, span: &Span) {
        span.record("status", res.status().as_u16());
        span.record("latency_ms", latency.as_millis());
        tracing::debug!(status = res.status().as_u16(), "finished processing request");
    }
}

/// `http_request` span around every request, recording status and latency.
pub fn trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    HttpRequestSpan,
    DefaultOnRequest,
    RecordStatus,
> {
    TraceLayer::new_for_http()
        .make_span_with(HttpRequestSpan)
        .on_response(RecordStatus)
}
