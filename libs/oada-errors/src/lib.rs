//! Error types shared by OADA services
//!
//! Pure data types for reporting errors to HTTP clients, with optional axum
//! integration behind the `axum` feature:
//! - Error catalog (`ErrDef`) with one entry per error kind
//! - Typed errors (`ErrorKind`, `OadaError`)
//! - The serialized error document (`ErrorBody`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod body;
pub mod catalog;
pub mod error;

pub use body::{APPLICATION_OADA_ERROR_JSON, ErrorBody};
pub use catalog::ErrDef;
pub use error::{ErrorKind, OadaError};
