pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{Router, middleware as axum_middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

/// The full HTTP application: API routes plus error normalisation, panic
/// catching and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::router(state))
        .layer(axum_middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}
