// ── PublishingClient ──
//
// Facade over authentication and the two reconcilers. Owns at most one
// `Session`; `authenticate` drops the old one before trying, so a failed
// re-authentication never leaves a stale session usable.

use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, info};

use dmpub_api::{Authenticator, Credentials, Download, DownloadVersion, Session};

use crate::config::{PublisherConfig, SiteUrl};
use crate::error::CoreError;
use crate::reconciler::ResourceReconciler;
use crate::versions::VersionPublisher;

/// Full result of a publish: both records and which of them were created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub download: Download,
    pub version: DownloadVersion,
    pub download_created: bool,
    pub version_created: bool,
}

/// Authenticate once, then publish versions idempotently.
pub struct PublishingClient {
    config: PublisherConfig,
    authenticator: Authenticator,
    session: Option<Session>,
}

impl PublishingClient {
    /// Create an unauthenticated client for `config.site`.
    pub fn new(config: PublisherConfig) -> Result<Self, CoreError> {
        let authenticator = Authenticator::new(
            config.site.as_url().clone(),
            config.flavor,
            config.transport(),
            config.retry,
        )?;
        Ok(Self {
            config,
            authenticator,
            session: None,
        })
    }

    pub fn site(&self) -> &SiteUrl {
        &self.config.site
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The current session, if [`authenticate`](Self::authenticate) succeeded.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Exchange `credentials` for a session.
    ///
    /// Any previous session is discarded first. On failure the client is
    /// left unauthenticated.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), CoreError> {
        self.session = None;

        CoreError::require_non_empty("username", &credentials.username)?;
        CoreError::require_non_empty("password", credentials.password.expose_secret())?;

        info!(site = %self.config.site, user = %credentials.username, "authenticating");
        let session = self.authenticator.authenticate(credentials).await?;
        debug!(api_root = %session.api_root(), "session established");

        self.session = Some(session);
        Ok(())
    }

    /// Publish `version` at `url` under the download titled `title`.
    ///
    /// Creates the download and/or the version only when missing; calling
    /// this twice with identical arguments returns the same record.
    pub async fn publish_version(
        &self,
        title: &str,
        version: &str,
        url: &str,
    ) -> Result<DownloadVersion, CoreError> {
        Ok(self.publish(title, version, url).await?.version)
    }

    /// Like [`publish_version`](Self::publish_version), but returns both
    /// records and whether each was created.
    pub async fn publish(
        &self,
        title: &str,
        version: &str,
        url: &str,
    ) -> Result<Publication, CoreError> {
        let session = self.session.as_ref().ok_or(CoreError::NotAuthenticated)?;

        CoreError::require_non_empty("title", title)?;
        CoreError::require_non_empty("version", version)?;
        CoreError::require_non_empty("url", url)?;

        let download = ResourceReconciler::new(session).reconcile(title).await?;
        let download_created = download.was_created();
        let download = download.into_inner();

        let published = VersionPublisher::new(session)
            .reconcile(download.id, version, url)
            .await?;

        Ok(Publication {
            download,
            version_created: published.was_created(),
            version: published.into_inner(),
            download_created,
        })
    }
}
