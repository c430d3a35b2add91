//! Tower layers used in the HTTP client stack

mod user_agent;

pub use user_agent::UserAgentLayer;
