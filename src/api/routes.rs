//! Route definitions for the API.

use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::api::handlers;
use crate::AppState;

/// Build the router: a single handler serving every path.
///
/// Each request gets an INFO span (method, uri, version) and a response
/// event with status and latency.
pub fn build_router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .fallback(handlers::echo)
        .with_state(state)
        .layer(trace)
}
