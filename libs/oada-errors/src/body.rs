//! Serialized OADA error document (pure data model, no HTTP framework dependencies)

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Content type for OADA error documents.
pub const APPLICATION_OADA_ERROR_JSON: &str = "application/vnd.oada.error.1+json";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// Error document returned to clients for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ErrorBody {
    /// Machine-readable error kind, e.g. `NOT_FOUND`.
    pub code: String,
    /// HTTP status of this occurrence, serialized as a number.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: StatusCode,
    /// Short summary of the error kind.
    pub title: String,
    /// Explanation specific to this occurrence.
    pub detail: String,
    /// Link to documentation about this kind of error.
    pub href: String,
    /// Request path that produced the error.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: String::new(),
            status,
            title: title.into(),
            detail: detail.into(),
            href: String::new(),
            instance: String::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ErrorBody {
    fn into_response(self) -> axum::response::Response {
        use axum::http::HeaderValue;

        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_OADA_ERROR_JSON),
        );
        resp
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let body = ErrorBody::new(StatusCode::NOT_FOUND, "Not Found", "Route not found: /foo")
            .with_code("NOT_FOUND")
            .with_instance("/foo");

        assert_eq!(body.status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.instance, "/foo");
    }

    #[test]
    fn status_serializes_as_number_and_empty_fields_are_skipped() {
        let body = ErrorBody::new(StatusCode::NOT_FOUND, "Not Found", "missing");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status"], 404);
        assert!(json.get("instance").is_none());
    }

    #[test]
    fn deserialize_rejects_invalid_status() {
        let json = r#"{"code":"X","status":42,"title":"t","detail":"d","href":""}"#;
        assert!(serde_json::from_str::<ErrorBody>(json).is_err());
    }
}
