use crate::{spawn, url};
use frame_manifest::{FrameManifest, MANIFEST_PATH};
use reqwest::{StatusCode, header::CONTENT_TYPE};

const BASE: &str = "https://frames.example.com";

#[tokio::test(flavor = "multi_thread")]
async fn serves_manifest() {
    let mut server = spawn(BASE).await;
    assert!(server.is_running());
    assert_ne!(server.port(), 0);

    let resp = reqwest::get(url(&server, MANIFEST_PATH))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");

    let body = resp.text().await.unwrap();
    similar_asserts::assert_eq!(body, server.manifest().to_json().unwrap());

    let manifest: FrameManifest = serde_json::from_str(&body).unwrap();
    assert_eq!(manifest.frame.home_url, BASE);
    assert_eq!(manifest.frame.icon_url, "https://frames.example.com/icon.png");
    assert_eq!(manifest.frame.webhook_url, "https://frames.example.com/api/webhook");

    server.stop().await.unwrap();
    assert!(!server.is_running());
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_requests_are_identical() {
    let mut server = spawn(BASE).await;
    let url = url(&server, MANIFEST_PATH);

    let first = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    let second = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    assert_eq!(first, second);

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn only_get_is_allowed() {
    let mut server = spawn(BASE).await;
    let resp = reqwest::Client::new()
        .post(url(&server, MANIFEST_PATH))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn cannot_start_twice() {
    let mut server = spawn(BASE).await;
    assert!(matches!(server.start().await, Err(frame_server::ServerError::AlreadyRunning)));
    server.stop().await.unwrap();
}
