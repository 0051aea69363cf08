// In-memory Download Monitor site served through wiremock.
//
// Keeps downloads and versions in shared state so that list calls see
// what earlier create calls stored, and counts creates for idempotence
// assertions.
#![allow(clippy::unwrap_used, dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use dmpub_core::{PublisherConfig, PublishingClient, RetryPolicy, SiteUrl};

pub const TOKEN_PATH: &str = "/wp-json/jwt-auth/v1/token/";
pub const API_ROOT: &str = "/wp-json/download-monitor/v1";

#[derive(Default)]
struct State {
    downloads: Vec<Value>,
    versions: Vec<Value>,
    next_id: u64,
    download_creates: usize,
    version_creates: usize,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Copy)]
enum Op {
    ListDownloads,
    CreateDownload,
    ListVersions,
    CreateVersion,
}

struct Handler {
    state: Arc<Mutex<State>>,
    op: Op,
    delay: Duration,
}

impl Respond for Handler {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let response = match self.op {
            Op::ListDownloads => ResponseTemplate::new(200).set_body_json(&state.downloads),
            Op::CreateDownload => {
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                let id = state.next_id();
                let download = json!({
                    "id": id,
                    "status": "publish",
                    "title": body["title"],
                    "slug": format!("download-{id}"),
                    "author": 1,
                    "downloadLink": format!("https://example.com/download/{id}/"),
                });
                state.downloads.push(download.clone());
                state.download_creates += 1;
                ResponseTemplate::new(201).set_body_json(download)
            }
            Op::ListVersions => {
                let download_id = download_id_of(request);
                let versions: Vec<&Value> = state
                    .versions
                    .iter()
                    .filter(|v| v["downloadId"] == json!(download_id))
                    .collect();
                ResponseTemplate::new(200).set_body_json(versions)
            }
            Op::CreateVersion => {
                let download_id = download_id_of(request);
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                let id = state.next_id();
                let version = json!({
                    "id": id,
                    "downloadId": download_id,
                    "version": body["version"],
                    "url": body["url"],
                    "menuOrder": 0,
                    "date": { "date": "2019-03-14 09:26:53.000000", "timezone_type": 3, "timezone": "UTC" },
                    "downloadCount": 0,
                });
                state.versions.push(version.clone());
                state.version_creates += 1;
                ResponseTemplate::new(201).set_body_json(version)
            }
        };
        response.set_delay(self.delay)
    }
}

fn download_id_of(request: &Request) -> u64 {
    request
        .url
        .path()
        .trim_end_matches("/versions")
        .rsplit('/')
        .next()
        .unwrap()
        .parse()
        .unwrap()
}

/// Fake site with token endpoint, downloads and versions.
#[derive(Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<State>>,
    list_delay: Duration,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay list responses, so concurrent publishers both read before
    /// either writes.
    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = delay;
        self
    }

    /// Seed an existing download.
    pub fn with_download(self, title: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_id();
            state
                .downloads
                .push(json!({ "id": id, "status": "publish", "title": title }));
        }
        self
    }

    /// Seed an existing version under the most recently seeded download.
    pub fn with_version(self, version: &str, url: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let download_id = state.downloads.last().unwrap()["id"].as_u64().unwrap();
            let id = state.next_id();
            state.versions.push(json!({
                "id": id,
                "downloadId": download_id,
                "version": version,
                "url": url,
            }));
        }
        self
    }

    pub fn download_creates(&self) -> usize {
        self.state.lock().unwrap().download_creates
    }

    pub fn version_creates(&self) -> usize {
        self.state.lock().unwrap().version_creates
    }

    pub fn download_count(&self) -> usize {
        self.state.lock().unwrap().downloads.len()
    }

    /// Mount the token endpoint (accepting any credentials) and the
    /// downloads API.
    pub async fn mount(&self, server: &MockServer) {
        mount_token(server).await;
        self.mount_api(server).await;
    }

    /// Mount only the downloads API.
    pub async fn mount_api(&self, server: &MockServer) {
        let versions = format!(r"^{API_ROOT}/downloads/\d+/versions$");

        self.handler(Op::ListDownloads, "GET", server, Some(format!("{API_ROOT}/downloads")), None)
            .await;
        self.handler(Op::CreateDownload, "POST", server, Some(format!("{API_ROOT}/downloads")), None)
            .await;
        self.handler(Op::ListVersions, "GET", server, None, Some(versions.clone()))
            .await;
        self.handler(Op::CreateVersion, "POST", server, None, Some(versions))
            .await;
    }

    async fn handler(
        &self,
        op: Op,
        verb: &str,
        server: &MockServer,
        exact: Option<String>,
        regex: Option<String>,
    ) {
        let delay = match op {
            Op::ListDownloads | Op::ListVersions => self.list_delay,
            Op::CreateDownload | Op::CreateVersion => Duration::ZERO,
        };
        let handler = Handler {
            state: Arc::clone(&self.state),
            op,
            delay,
        };
        let mock = Mock::given(method(verb));
        let mock = match (exact, regex) {
            (Some(p), _) => mock.and(path(p)),
            (None, Some(r)) => mock.and(path_regex(r)),
            (None, None) => mock,
        };
        mock.respond_with(handler).mount(server).await;
    }
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-123",
            "user_email": "api@example.com",
            "user_nicename": "apiuser",
            "user_display_name": "Api User"
        })))
        .mount(server)
        .await;
}

pub fn config_for(server: &MockServer) -> PublisherConfig {
    let site = SiteUrl::from_url_unchecked(Url::parse(&server.uri()).unwrap());
    let mut config = PublisherConfig::new(site);
    config.retry = RetryPolicy::new(Duration::from_millis(20), 2);
    config
}

pub fn client_for(server: &MockServer) -> PublishingClient {
    PublishingClient::new(config_for(server)).unwrap()
}

pub fn credentials() -> dmpub_core::Credentials {
    dmpub_core::Credentials::new("ApiUser", secrecy::SecretString::from("s3cret".to_string()))
}

/// Number of requests the server received whose path starts with `prefix`.
pub async fn requests_to(server: &MockServer, prefix: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().starts_with(prefix))
        .count()
}
