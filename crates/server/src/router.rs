use crate::{handlers, state::ServerState};
use axum::{
    Router,
    routing::{get, post},
};
use frame_manifest::{MANIFEST_PATH, WEBHOOK_PATH};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Lists the webhook events received so far.
pub const WEBHOOK_EVENTS_PATH: &str = "/api/webhook/events";

pub(crate) fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(MANIFEST_PATH, get(handlers::get_manifest))
        .route(WEBHOOK_PATH, post(handlers::post_webhook))
        .route(WEBHOOK_EVENTS_PATH, get(handlers::get_webhook_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
