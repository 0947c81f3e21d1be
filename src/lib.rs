use axum::{extract::Request, Router};
use tower_http::trace::TraceLayer;

use crate::logging::Logger;

pub mod api;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod server;
pub mod shutdown;

/// Build identifier, usually a short git revision. Empty when unknown.
pub const RELEASE: &str = env!("CANVAS_RELEASE");

pub fn app(log: &Logger) -> Router {
    let parent = log.span().clone();

    Router::new()
        .merge(api::routes::routes())
        .layer(
            TraceLayer::new_for_http().make_span_with(move |request: &Request| {
                tracing::info_span!(
                    parent: &parent,
                    "request",
                    method = %request.method(),
                    uri = %request.uri()
                )
            }),
        )
}
