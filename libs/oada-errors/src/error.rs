//! Typed OADA errors

use std::fmt;

use crate::body::ErrorBody;
use crate::catalog::{self, ErrDef};

/// Kind of error reported to a client. Each kind maps to one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    NotFound,
    MethodNotAllowed,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn def(self) -> &'static ErrDef {
        match self {
            Self::NotFound => &catalog::NOT_FOUND,
            Self::MethodNotAllowed => &catalog::METHOD_NOT_ALLOWED,
            Self::Internal => &catalog::INTERNAL_ERROR,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        self.def().code
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An error with a kind and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct OadaError {
    pub kind: ErrorKind,
    pub message: String,
}

impl OadaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Render this error as the document sent to clients.
    pub fn to_body(&self) -> ErrorBody {
        self.kind.def().as_body(self.message.clone())
    }
}

impl From<OadaError> for ErrorBody {
    fn from(err: OadaError) -> Self {
        err.kind.def().as_body(err.message)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn kind_maps_to_matching_status() {
        assert_eq!(ErrorKind::NotFound.def().status, 404);
        assert_eq!(ErrorKind::Internal.def().status, 500);
        assert_eq!(ErrorKind::MethodNotAllowed.code(), "METHOD_NOT_ALLOWED");
    }

    #[test]
    fn error_converts_to_body() {
        let err = OadaError::not_found("Route not found: /foo");
        assert_eq!(err.to_string(), "NOT_FOUND: Route not found: /foo");

        let body: ErrorBody = err.into();
        assert_eq!(body.status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.detail, "Route not found: /foo");
    }
}
