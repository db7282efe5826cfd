//! Axum router construction.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/master-key", post(handlers::create_master_key))
        .route("/credentials/file", post(handlers::read_file))
        .route("/credentials/inline", post(handlers::read_inline))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found);

    middleware::apply(routes, request_timeout).with_state(state)
}
