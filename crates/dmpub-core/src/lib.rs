// dmpub-core: idempotent release publishing for Download Monitor sites
//
// Layers get-or-create semantics for downloads and versions on top of
// `dmpub-api` and exposes a single facade, `PublishingClient`, that the
// CLI drives: authenticate, then publish.

pub mod client;
pub mod config;
pub mod error;
pub mod reconciler;
pub mod versions;

pub use client::{PublishingClient, Publication};
pub use config::{PublisherConfig, SiteUrl, artifact_url, normalize_remote_path};
pub use error::CoreError;
pub use reconciler::{Reconciled, ResourceReconciler};
pub use versions::VersionPublisher;

// Re-export the wire types callers need without depending on dmpub-api.
pub use dmpub_api::{
    ApiFlavor, Credentials, Download, DownloadVersion, RetryPolicy, Session, TlsMode,
    WordPressDate,
};
