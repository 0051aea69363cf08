// JWT token negotiation
//
// Exchanges a username/password for a bearer token at the WordPress
// JWT endpoint and hands back an authenticated `Session`. Server-side
// failures (5xx) are retried per `RetryPolicy`; anything else fails fast.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{Error, status_message};
use crate::retry::RetryPolicy;
use crate::session::Session;
use crate::transport::TransportConfig;

/// Username and password for the WordPress JWT endpoint.
///
/// The password stays wrapped in [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Which REST plugin the site exposes.
///
/// Determines the API root. Both flavors authenticate through the same
/// JWT endpoint and accept identical request bodies.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum ApiFlavor {
    /// Download Monitor plugin -- `/wp-json/download-monitor/v1/`.
    #[default]
    #[serde(rename = "download-monitor")]
    #[strum(serialize = "download-monitor")]
    DownloadMonitor,
    /// DokuMate release plugin -- `/wp-json/dokumate/v1/`.
    #[serde(rename = "dokumate")]
    #[strum(serialize = "dokumate")]
    DokuMate,
}

impl ApiFlavor {
    /// The JWT token endpoint, relative to the site root.
    pub fn auth_path(&self) -> &'static str {
        "/wp-json/jwt-auth/v1/token/"
    }

    /// Root of the downloads API, relative to the site root.
    pub fn api_root(&self) -> &'static str {
        match self {
            Self::DownloadMonitor => "/wp-json/download-monitor/v1/",
            Self::DokuMate => "/wp-json/dokumate/v1/",
        }
    }
}

/// Profile fields returned alongside the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthenticatedUser {
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_nicename: Option<String>,
    #[serde(default)]
    pub user_display_name: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    #[serde(flatten)]
    user: AuthenticatedUser,
}

/// Negotiates bearer tokens for one site.
///
/// Holds no session state: each [`authenticate`](Self::authenticate) call
/// starts unauthenticated and either returns a complete [`Session`] or an
/// error.
pub struct Authenticator {
    http: reqwest::Client,
    site: Url,
    flavor: ApiFlavor,
    transport: TransportConfig,
    retry: RetryPolicy,
}

impl Authenticator {
    /// Create an authenticator for `site` (the WordPress root URL).
    ///
    /// The scheme is not checked here; callers that require HTTPS
    /// validate before constructing.
    pub fn new(
        site: Url,
        flavor: ApiFlavor,
        transport: TransportConfig,
        retry: RetryPolicy,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            site,
            flavor,
            transport,
            retry,
        })
    }

    pub fn site(&self) -> &Url {
        &self.site
    }

    pub fn flavor(&self) -> ApiFlavor {
        self.flavor
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// `{site}/wp-json/jwt-auth/v1/token/`
    pub fn token_url(&self) -> Result<Url, Error> {
        site_relative(&self.site, self.flavor.auth_path())
    }

    /// `{site}/wp-json/<plugin>/v1/`
    pub fn api_root(&self) -> Result<Url, Error> {
        site_relative(&self.site, self.flavor.api_root())
    }

    /// Exchange `credentials` for a bearer token and open a [`Session`].
    ///
    /// 5xx responses are retried with doubling waits until the policy's
    /// budget runs out, at which point [`Error::RetriesExhausted`] wraps
    /// the last failure. 4xx responses fail immediately as
    /// [`Error::Authentication`].
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, Error> {
        let url = self.token_url()?;
        let mut delay = self.retry.initial_delay;
        let mut remaining = self.retry.max_retries;
        let mut attempt: u32 = 1;

        loop {
            match self.request_token(&url, credentials).await {
                Ok(token) => {
                    if attempt > 1 {
                        info!(attempts = attempt, "token request succeeded after retry");
                    }
                    return self.open_session(token);
                }
                Err(e) if self.retry.should_retry(&e, remaining) => {
                    warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.retry.max_attempts(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "token request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = self.retry.next_delay(delay);
                    remaining -= 1;
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    error!(error = %e, attempts = attempt, "giving up on token request");
                    return Err(Error::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    debug!(error = %e, "token request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn request_token(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> Result<TokenResponse, Error> {
        debug!("POST {}", url);

        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });

        let resp = self
            .http
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::ServerError {
                endpoint: url.to_string(),
                status: status.as_u16(),
                message: status_message(status, &body),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                status: status.as_u16(),
                message: status_message(status, &body),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("token response: {e}"),
            body: String::new(),
        })
    }

    fn open_session(&self, token: TokenResponse) -> Result<Session, Error> {
        if token.token.trim().is_empty() {
            return Err(Error::Deserialization {
                message: "token response carried an empty token".into(),
                body: String::new(),
            });
        }

        let bearer = SecretString::from(token.token);

        let mut value = HeaderValue::from_str(&format!("Bearer {}", bearer.expose_secret()))
            .map_err(|e| Error::Deserialization {
                message: format!("token is not a valid header value: {e}"),
                body: String::new(),
            })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let http = self.transport.build_client_with_headers(headers)?;
        let session = Session::new(
            http,
            self.api_root()?,
            self.transport.timeout,
            bearer,
            token.user,
        );

        debug!(
            user = session.user().user_nicename.as_deref().unwrap_or("?"),
            "token acquired"
        );
        Ok(session)
    }
}

/// Join an absolute path onto the site root, keeping any sub-directory
/// the site lives under (`https://host/blog` + `/wp-json/...`).
fn site_relative(site: &Url, path: &str) -> Result<Url, Error> {
    let base = site.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}{path}")).map_err(Error::InvalidUrl)
}
