//! Get-or-create for version records under one download.
//!
//! Version strings match exactly: no trimming, no case folding. This is
//! stricter than title matching, so `"1.0"` and `"1.0 "` are distinct
//! versions. An existing version is returned as-is even when its stored
//! URL differs from the requested one; the first write stays
//! authoritative.

use tracing::{info, warn};

use dmpub_api::{DownloadVersion, Session};

use crate::error::CoreError;
use crate::reconciler::Reconciled;

/// Publishes version records for an already-resolved download.
pub struct VersionPublisher<'a> {
    session: &'a Session,
}

impl<'a> VersionPublisher<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Return the version `version` of download `download_id`, creating
    /// it with `url` if absent.
    pub async fn publish(
        &self,
        download_id: u64,
        version: &str,
        url: &str,
    ) -> Result<DownloadVersion, CoreError> {
        Ok(self.reconcile(download_id, version, url).await?.into_inner())
    }

    /// Like [`publish`](Self::publish), but reports whether the version
    /// already existed.
    pub async fn reconcile(
        &self,
        download_id: u64,
        version: &str,
        url: &str,
    ) -> Result<Reconciled<DownloadVersion>, CoreError> {
        CoreError::require_non_empty("version", version)?;
        CoreError::require_non_empty("url", url)?;

        let versions = self.session.list_versions(download_id).await?;
        if let Some(existing) = find_exact_version(versions, version) {
            if existing.url != url {
                warn!(
                    download_id,
                    version,
                    stored_url = %existing.url,
                    requested_url = url,
                    "version already published with a different URL; keeping the stored one"
                );
            }
            info!(id = existing.id, download_id, version, "using existing version");
            return Ok(Reconciled::Existing(existing));
        }

        let created = self
            .session
            .create_version(download_id, version, url)
            .await?;
        info!(id = created.id, download_id, version, "created version");
        Ok(Reconciled::Created(created))
    }
}

/// First version whose version string is byte-for-byte equal to `version`.
pub fn find_exact_version(
    versions: Vec<DownloadVersion>,
    version: &str,
) -> Option<DownloadVersion> {
    versions.into_iter().find(|v| v.version == version)
}
