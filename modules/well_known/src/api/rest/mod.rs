pub mod cors;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod trace;

pub use routes::router;
