// Downloads and download-version endpoints
//
// GET/POST `downloads` and `downloads/{id}/versions` relative to the
// session's API root. Listing is a single call; the API is not paged.

use tracing::debug;

use crate::error::Error;
use crate::models::{Download, DownloadVersion, NewDownload, NewVersion};
use crate::session::Session;

impl Session {
    /// List every download visible to the authenticated user.
    ///
    /// `GET downloads`
    pub async fn list_downloads(&self) -> Result<Vec<Download>, Error> {
        let downloads: Vec<Download> = self.get("downloads").await?;
        debug!(count = downloads.len(), "listed downloads");
        Ok(downloads)
    }

    /// Create a download with the given title.
    ///
    /// `POST downloads` with `{ "title": ... }`
    pub async fn create_download(&self, title: &str) -> Result<Download, Error> {
        self.post("downloads", &NewDownload { title }).await
    }

    /// List the versions recorded under a download.
    ///
    /// `GET downloads/{id}/versions`
    pub async fn list_versions(&self, download_id: u64) -> Result<Vec<DownloadVersion>, Error> {
        let versions: Vec<DownloadVersion> =
            self.get(&versions_path(download_id)).await?;
        debug!(download_id, count = versions.len(), "listed versions");
        Ok(versions)
    }

    /// Create a version record under a download.
    ///
    /// `POST downloads/{id}/versions` with `{ "version": ..., "url": ... }`
    pub async fn create_version(
        &self,
        download_id: u64,
        version: &str,
        url: &str,
    ) -> Result<DownloadVersion, Error> {
        self.post(&versions_path(download_id), &NewVersion { version, url })
            .await
    }
}

fn versions_path(download_id: u64) -> String {
    format!("downloads/{download_id}/versions")
}
