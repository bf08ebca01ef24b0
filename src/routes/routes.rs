//! Router and middleware stack.
//!
//! ## Structure
//! - `GET /teste`   — placeholder that confirms the server answers
//! - `GET /healthz` — liveness
//! - `GET /readyz`  — readiness (database + static directory)
//! - everything else falls through to the static file directory, and then
//!   to a JSON 404.
//!
//! Every route, static files included, goes through the same layers:
//! request tracing, a 100 KiB body limit and permissive CORS.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        status_handlers::{not_found, teste},
    },
    state::AppState,
};
use axum::{Router, handler::HandlerWithoutStateExt, routing::get};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};

/// Largest request body accepted, matching the usual JSON body-parser default.
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Build the application router with its shared state applied.
pub fn routes(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .route("/teste", get(teste).fallback(not_found))
        .route("/healthz", get(healthz).fallback(not_found))
        .route("/readyz", get(readyz).fallback(not_found))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
