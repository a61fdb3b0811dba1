use crate::{spawn, url};
use frame_client::NotificationDetails;
use frame_manifest::WEBHOOK_PATH;
use frame_server::{
    ApiError, WEBHOOK_EVENTS_PATH, WebhookEnvelope, WebhookEvent, WebhookHeader, WebhookPayload,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn header(fid: u64) -> WebhookHeader {
    WebhookHeader {
        fid,
        kind: "app_key".to_string(),
        key: "0x2b4d92e7626c5fc56cb4641f6f758563de1f6bdbb5ac40da1ab19f8a6f23e4a".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn records_webhook_events() {
    let client = reqwest::Client::new();
    let mut server = spawn("https://frames.example.com").await;
    let webhook = url(&server, WEBHOOK_PATH);

    let payloads = [
        WebhookPayload::FrameAdded {
            notification_details: Some(NotificationDetails {
                url: "https://api.warpcast.com/v1/frame-notifications".to_string(),
                token: "a05059ef2415c67b08ecceb539201cbc6".to_string(),
            }),
        },
        WebhookPayload::NotificationsDisabled,
        WebhookPayload::FrameRemoved,
    ];
    for payload in &payloads {
        let envelope = WebhookEnvelope::encode(&header(887246), payload, "0xsig").unwrap();
        let resp = client.post(&webhook).json(&envelope).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.json::<Value>().await.unwrap(), json!({ "success": true }));
    }

    let events: Vec<WebhookEvent> = client
        .get(url(&server, WEBHOOK_EVENTS_PATH))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(events, server.events());
    let names = events.iter().map(|event| event.payload.name()).collect::<Vec<_>>();
    assert_eq!(names, ["frame_added", "notifications_disabled", "frame_removed"]);
    assert!(events.iter().all(|event| event.fid == 887246));

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn rejects_malformed_envelopes() {
    let client = reqwest::Client::new();
    let mut server = spawn("https://frames.example.com").await;
    let webhook = url(&server, WEBHOOK_PATH);

    let resp = client.post(&webhook).body("not json").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = resp.json().await.unwrap();
    assert_eq!(err.code, 400);
    assert!(err.message.starts_with("invalid webhook envelope"), "{}", err.message);

    let resp = client
        .post(&webhook)
        .json(&json!({ "header": "%%%", "payload": "", "signature": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = resp.json().await.unwrap();
    assert!(err.message.contains("header"), "{}", err.message);

    assert!(server.events().is_empty());
    server.stop().await.unwrap();
}
