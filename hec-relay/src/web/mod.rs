//! Web server module for receiving Zoom webhooks.
//!
//! This module provides a thin axum layer that:
//! - Accepts Zoom webhook deliveries on `/webhooks/zoom`
//! - Hands them to the relay flow
//! - Exposes `/health` for the hosting environment

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, zoom_webhook, AppState, HealthResponse};

/// Path Zoom is configured to deliver to.
pub const WEBHOOK_PATH: &str = "/webhooks/zoom";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(WEBHOOK_PATH, post(zoom_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
