#![allow(clippy::unwrap_used)]
// Integration tests for the downloads/versions endpoints using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dmpub_api::{
    ApiFlavor, Authenticator, Credentials, Error, RetryPolicy, Session, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(flavor: ApiFlavor) -> (MockServer, Session) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wp-json/jwt-auth/v1/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok" })))
        .mount(&server)
        .await;

    let auth = Authenticator::new(
        Url::parse(&server.uri()).unwrap(),
        flavor,
        TransportConfig::default(),
        RetryPolicy::none(),
    )
    .unwrap();
    let session = auth
        .authenticate(&Credentials::new(
            "ApiUser",
            SecretString::from("pw".to_string()),
        ))
        .await
        .unwrap();

    (server, session)
}

fn dm_path(suffix: &str) -> String {
    format!("/wp-json/download-monitor/v1/{suffix}")
}

// ── Downloads ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_downloads() {
    let (server, session) = setup(ApiFlavor::DownloadMonitor).await;

    Mock::given(method("GET"))
        .and(path(dm_path("downloads")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "status": "publish", "title": "Product X", "slug": "product-x", "author": 1, "downloadLink": "https://host/download/1/" },
            { "id": 2, "status": "draft", "title": null, "slug": "untitled", "author": 1, "downloadLink": "https://host/download/2/" }
        ])))
        .mount(&server)
        .await;

    let downloads = session.list_downloads().await.unwrap();

    assert_eq!(downloads.len(), 2);
    assert_eq!(downloads[0].title.as_deref(), Some("Product X"));
    assert_eq!(downloads[1].title, None);
}

#[tokio::test]
async fn test_create_download() {
    let (server, session) = setup(ApiFlavor::DownloadMonitor).await;

    Mock::given(method("POST"))
        .and(path(dm_path("downloads")))
        .and(body_json(json!({ "title": "Product X" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 17, "status": "publish", "title": "Product X"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let download = session.create_download("Product X").await.unwrap();
    assert_eq!(download.id, 17);
}

#[tokio::test]
async fn test_list_downloads_server_error_is_api_error() {
    let (server, session) = setup(ApiFlavor::DownloadMonitor).await;

    Mock::given(method("GET"))
        .and(path(dm_path("downloads")))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .expect(1)
        .mount(&server)
        .await;

    let result = session.list_downloads().await;

    match result {
        Err(Error::Api {
            ref endpoint,
            status,
            ref message,
        }) => {
            assert_eq!(status, 500);
            assert!(endpoint.ends_with("/downloads"), "endpoint: {endpoint}");
            assert!(message.contains("Internal Server Error"), "message: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Versions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_and_create_versions() {
    let (server, session) = setup(ApiFlavor::DownloadMonitor).await;

    Mock::given(method("GET"))
        .and(path(dm_path("downloads/17/versions")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "downloadId": 17, "version": "2.8.2", "url": "https://host/2.8.2.zip", "menuOrder": 0, "downloadCount": 5 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(dm_path("downloads/17/versions")))
        .and(body_json(json!({ "version": "2.8.3", "url": "https://host/2.8.3.zip" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 4, "downloadId": 17, "version": "2.8.3", "url": "https://host/2.8.3.zip"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let versions = session.list_versions(17).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, "2.8.2");

    let created = session
        .create_version(17, "2.8.3", "https://host/2.8.3.zip")
        .await
        .unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(created.download_id, 17);
}

#[tokio::test]
async fn test_dokumate_flavor_snake_case() {
    let (server, session) = setup(ApiFlavor::DokuMate).await;

    Mock::given(method("GET"))
        .and(path("/wp-json/dokumate/v1/downloads/5/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "download_id": 5, "version": "1.0", "url": "https://host/1.0.zip", "menu_order": 0, "download_count": 0 }
        ])))
        .mount(&server)
        .await;

    let versions = session.list_versions(5).await.unwrap();
    assert_eq!(versions[0].download_id, 5);
}

#[tokio::test]
async fn test_create_version_rejected() {
    let (server, session) = setup(ApiFlavor::DownloadMonitor).await;

    Mock::given(method("POST"))
        .and(path(dm_path("downloads/17/versions")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = session.create_version(17, "1.0", "https://host/a.zip").await;
    assert!(
        matches!(result, Err(Error::Api { status: 403, .. })),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unexpected_body_is_deserialization_error() {
    let (server, session) = setup(ApiFlavor::DownloadMonitor).await;

    Mock::given(method("GET"))
        .and(path(dm_path("downloads")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = session.list_downloads().await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => assert!(body.contains("oops")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
