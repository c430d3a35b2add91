//! Static error catalog

use crate::body::ErrorBody;
use http::StatusCode;

/// Where clients can read about OADA error documents.
pub const ERROR_DOCS_URL: &str = "https://github.com/OADA/oada-docs/blob/master/rest-specs/README.md";

/// Static error definition from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub href: &'static str,
}

impl ErrDef {
    /// Build an error body for this definition with the given detail.
    #[inline]
    pub fn as_body(&self, detail: impl Into<String>) -> ErrorBody {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ErrorBody::new(status, self.title, detail)
            .with_code(self.code)
            .with_href(self.href)
    }
}

pub const NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "NOT_FOUND",
    href: ERROR_DOCS_URL,
};

pub const METHOD_NOT_ALLOWED: ErrDef = ErrDef {
    status: 405,
    title: "Method Not Allowed",
    code: "METHOD_NOT_ALLOWED",
    href: ERROR_DOCS_URL,
};

pub const INTERNAL_ERROR: ErrDef = ErrDef {
    status: 500,
    title: "Internal Error",
    code: "INTERNAL_ERROR",
    href: ERROR_DOCS_URL,
};
