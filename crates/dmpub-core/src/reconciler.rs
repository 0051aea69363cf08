//! Get-or-create for downloads, keyed by title.
//!
//! The server allows duplicate titles, so the lookup that precedes every
//! create is the only uniqueness guard. Titles compare trimmed and
//! case-insensitively; when several existing downloads normalize to the
//! same title, the first one in list order wins.
//!
//! Lookup and create are two separate requests. Two publishers racing on
//! the same title from different processes can both miss the lookup and
//! both create.

use tracing::info;

use dmpub_api::models::normalize_title;
use dmpub_api::{Download, Session};

use crate::error::CoreError;

/// Outcome of a get-or-create: the record, and whether this call made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled<T> {
    /// Found on the server; returned unchanged.
    Existing(T),
    /// Not found; created by this call.
    Created(T),
}

impl<T> Reconciled<T> {
    pub fn get(&self) -> &T {
        match self {
            Self::Existing(t) | Self::Created(t) => t,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Existing(t) | Self::Created(t) => t,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Resolves a human-entered title to a download, creating it if absent.
pub struct ResourceReconciler<'a> {
    session: &'a Session,
}

impl<'a> ResourceReconciler<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Return the download titled `title`, creating it if none matches.
    pub async fn resolve_or_create(&self, title: &str) -> Result<Download, CoreError> {
        Ok(self.reconcile(title).await?.into_inner())
    }

    /// Like [`resolve_or_create`](Self::resolve_or_create), but reports
    /// whether the download already existed.
    ///
    /// A new download is created with the trimmed title, original case
    /// preserved.
    pub async fn reconcile(&self, title: &str) -> Result<Reconciled<Download>, CoreError> {
        let trimmed = title.trim();
        CoreError::require_non_empty("title", trimmed)?;

        let downloads = self.session.list_downloads().await?;
        if let Some(existing) = find_by_title(downloads, trimmed) {
            info!(id = existing.id, title = trimmed, "using existing download");
            return Ok(Reconciled::Existing(existing));
        }

        let created = self.session.create_download(trimmed).await?;
        info!(id = created.id, title = trimmed, "created download");
        Ok(Reconciled::Created(created))
    }
}

/// First download whose normalized title equals the normalized `title`.
///
/// Downloads with a null title never match.
pub fn find_by_title(downloads: Vec<Download>, title: &str) -> Option<Download> {
    let wanted = normalize_title(title);
    downloads
        .into_iter()
        .find(|d| d.normalized_title().as_deref() == Some(wanted.as_str()))
}
