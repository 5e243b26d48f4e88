use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::accounts;
use super::health;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(accounts::create_accounts_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
