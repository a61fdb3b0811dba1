use crate::{
    error::ApiError,
    state::ServerState,
    webhook::{WebhookEnvelope, WebhookEvent},
};
use axum::{Json, body::Bytes, extract::State};
use frame_manifest::FrameManifest;
use serde_json::{Value, json};
use std::sync::Arc;

pub(crate) async fn get_manifest(State(state): State<Arc<ServerState>>) -> Json<FrameManifest> {
    trace!(target: "frame::server", "serving manifest");
    Json(state.manifest.clone())
}

pub(crate) async fn post_webhook(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let event = WebhookEnvelope::from_slice(&body)
        .and_then(|envelope| envelope.decode())
        .inspect_err(|err| warn!(target: "frame::webhook", %err, "rejected webhook"))?;

    info!(target: "frame::webhook", fid = event.fid, event = event.payload.name(), "received webhook");
    state.events.push(event);

    Ok(Json(json!({ "success": true })))
}

pub(crate) async fn get_webhook_events(
    State(state): State<Arc<ServerState>>,
) -> Json<Vec<WebhookEvent>> {
    Json(state.events.recent())
}
