// ── Runtime publishing configuration ──
//
// These types describe *where* and *how* to publish. They never touch
// disk: the CLI builds a `PublisherConfig` and hands it in.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use dmpub_api::{ApiFlavor, RetryPolicy, TlsMode, TransportConfig};

use crate::error::CoreError;

/// A WordPress site root, normalized and restricted to HTTPS.
///
/// Input is trimmed and lowercased; trailing slashes are dropped so that
/// [`as_str`](Self::as_str) can be joined with `/`-prefixed paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl(Url);

impl SiteUrl {
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let normalized = input.trim().to_lowercase();

        if !normalized.starts_with("https://") {
            return Err(CoreError::validation(
                "site",
                format!("'{normalized}' must use the https scheme"),
            ));
        }

        let trimmed = normalized.trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| CoreError::validation("site", format!("'{trimmed}': {e}")))?;

        if url.host_str().is_none_or(str::is_empty) {
            return Err(CoreError::validation(
                "site",
                format!("'{trimmed}' has no host"),
            ));
        }

        Ok(Self(url))
    }

    /// Wrap `url` without the HTTPS check.
    ///
    /// For local mock servers only; every user-facing path goes through
    /// [`parse`](Self::parse).
    pub fn from_url_unchecked(url: Url) -> Self {
        Self(url)
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The site root without a trailing slash.
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteUrl {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Configuration for publishing to a single site.
///
/// Built by the CLI, passed to [`PublishingClient`](crate::PublishingClient).
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Site root, e.g. `https://example.com`.
    pub site: SiteUrl,
    /// Which REST plugin serves the downloads API.
    pub flavor: ApiFlavor,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Backoff for the token request.
    pub retry: RetryPolicy,
    /// TLS trust configuration.
    pub tls: TlsMode,
}

impl PublisherConfig {
    /// Defaults: Download Monitor flavor, 2000 ms timeout, 3000 ms initial
    /// backoff with 2 retries, system trust roots.
    pub fn new(site: SiteUrl) -> Self {
        Self {
            site,
            flavor: ApiFlavor::default(),
            timeout: TransportConfig::DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            tls: TlsMode::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}

// ── Artifact URLs ────────────────────────────────────────────────────

/// Normalize a remote folder: backslashes become `/`, empty and `.`
/// segments are dropped, `..` pops the previous segment, and no leading
/// or trailing slash remains.
pub fn normalize_remote_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment.trim() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Public URL of an uploaded artifact: `{site}/{remote_folder}/{file_name}`.
pub fn artifact_url(
    site: &SiteUrl,
    remote_folder: &str,
    file_name: &str,
) -> Result<String, CoreError> {
    let file_name = file_name.trim().trim_matches('/');
    CoreError::require_non_empty("file name", file_name)?;

    let folder = normalize_remote_path(remote_folder);
    Ok(if folder.is_empty() {
        format!("{site}/{file_name}")
    } else {
        format!("{site}/{folder}/{file_name}")
    })
}
