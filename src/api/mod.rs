//! HTTP API layer for json-echo.
//!
//! A single fallback handler: request metadata on GET, JSON echo otherwise.

pub mod handlers;
mod pretty;
mod routes;
mod types;

pub use pretty::PrettyJson;
pub use routes::build_router;
pub use types::MessageResponse;
