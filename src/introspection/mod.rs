//! Read-only operational endpoints.
//!
//! `GET /health` and `GET /services` never reach the dispatcher. Any other
//! method on these paths gets the same JSON 404 as an unmatched path.

pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::*;
use crate::http::server::AppState;

pub fn introspection_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(get_health).fallback(not_served))
        .route("/services", get(get_services).fallback(not_served))
}
