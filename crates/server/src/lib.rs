//! # frame-server
//!
//! Serves the frame manifest at [`MANIFEST_PATH`](frame_manifest::MANIFEST_PATH) and receives
//! the events a host posts to [`WEBHOOK_PATH`](frame_manifest::WEBHOOK_PATH).

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod args;
pub mod opts;

mod error;
pub use error::{ApiError, ServerError};

mod handlers;

mod router;
pub use router::WEBHOOK_EVENTS_PATH;

mod server;
pub use server::{DEFAULT_PORT, FrameServer, ServerConfig};

mod state;

pub mod webhook;
pub use webhook::{
    EventLog, WebhookEnvelope, WebhookError, WebhookEvent, WebhookHeader, WebhookPayload,
};
