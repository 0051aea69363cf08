// Authenticated request capability
//
// A `Session` exists only after a successful token exchange: it owns an
// HTTP client whose default headers carry `Authorization: Bearer <token>`,
// a fixed API root, and a fixed timeout. It is never mutated afterwards.
// Endpoint methods live in `downloads.rs` as inherent impls.

use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::AuthenticatedUser;
use crate::error::{Error, status_message};

/// A valid, immutable authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    api_root: Url,
    timeout: Duration,
    token: SecretString,
    user: AuthenticatedUser,
}

impl Session {
    pub(crate) fn new(
        http: reqwest::Client,
        api_root: Url,
        timeout: Duration,
        token: SecretString,
        user: AuthenticatedUser,
    ) -> Self {
        Self {
            http,
            api_root,
            timeout,
            token,
            user,
        }
    }

    /// Root all endpoint paths are resolved against.
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Per-request timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn bearer_token(&self) -> &SecretString {
        &self.token
    }

    /// Profile of the account the token belongs to.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint path (no leading slash) against the API root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.api_root.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_response(&url, resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_response(&url, resp).await
    }

    /// Map non-2xx responses to [`Error::Api`], otherwise decode the body.
    async fn parse_response<T: DeserializeOwned>(
        url: &Url,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        trace!(%status, "response from {}", url);

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                endpoint: url.to_string(),
                status: status.as_u16(),
                message: status_message(status, &body),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
