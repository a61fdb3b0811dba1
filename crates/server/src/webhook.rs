//! Decoding and bookkeeping of the events a host posts to the webhook.

use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use frame_client::NotificationDetails;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::VecDeque;

/// Number of webhook events kept for inspection.
pub const EVENT_LOG_CAPACITY: usize = 32;

/// base64url, accepting both padded and unpadded input.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("webhook {part} is not valid base64url: {source}")]
    Base64 { part: &'static str, source: base64::DecodeError },
    #[error("invalid webhook {part}: {source}")]
    Json { part: &'static str, source: serde_json::Error },
}

/// The signed message a host posts, every part base64url encoded JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    pub header: String,
    pub payload: String,
    /// Not verified.
    pub signature: String,
}

impl WebhookEnvelope {
    /// Parses an envelope from a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(WebhookError::Envelope)
    }

    /// Encodes `header` and `payload` into an envelope.
    pub fn encode(
        header: &WebhookHeader,
        payload: &WebhookPayload,
        signature: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            header: BASE64_URL.encode(serde_json::to_vec(header)?),
            payload: BASE64_URL.encode(serde_json::to_vec(payload)?),
            signature: signature.into(),
        })
    }

    /// Decodes header and payload.
    pub fn decode(&self) -> Result<WebhookEvent, WebhookError> {
        let header: WebhookHeader = decode_part("header", &self.header)?;
        let payload = decode_part("payload", &self.payload)?;
        Ok(WebhookEvent { fid: header.fid, key: header.key, payload })
    }
}

fn decode_part<T: DeserializeOwned>(part: &'static str, encoded: &str) -> Result<T, WebhookError> {
    let bytes = BASE64_URL
        .decode(encoded.trim())
        .map_err(|source| WebhookError::Base64 { part, source })?;
    serde_json::from_slice(&bytes).map_err(|source| WebhookError::Json { part, source })
}

/// Identifies the user and the key that signed the event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookHeader {
    pub fid: u64,
    /// Signer type, e.g. `app_key`.
    #[serde(rename = "type")]
    pub kind: String,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WebhookPayload {
    FrameAdded {
        #[serde(
            rename = "notificationDetails",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        notification_details: Option<NotificationDetails>,
    },
    FrameRemoved,
    NotificationsEnabled {
        #[serde(rename = "notificationDetails")]
        notification_details: NotificationDetails,
    },
    NotificationsDisabled,
}

impl WebhookPayload {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FrameAdded { .. } => "frame_added",
            Self::FrameRemoved => "frame_removed",
            Self::NotificationsEnabled { .. } => "notifications_enabled",
            Self::NotificationsDisabled => "notifications_disabled",
        }
    }
}

/// A decoded webhook event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub fid: u64,
    pub key: String,
    pub payload: WebhookPayload,
}

/// Bounded log of the most recent webhook events, oldest first.
#[derive(Debug)]
pub struct EventLog {
    capacity: usize,
    events: Mutex<VecDeque<WebhookEvent>>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, events: Mutex::new(VecDeque::with_capacity(capacity)) }
    }

    /// Appends an event, evicting the oldest one when full.
    pub fn push(&self, event: WebhookEvent) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn recent(&self) -> Vec<WebhookEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
