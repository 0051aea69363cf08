// dmpub-api: Async Rust client for the WordPress Download Monitor REST API

pub mod auth;
pub mod downloads;
pub mod error;
pub mod models;
pub mod retry;
pub mod session;
pub mod transport;

pub use auth::{ApiFlavor, AuthenticatedUser, Authenticator, Credentials};
pub use error::Error;
pub use models::{Download, DownloadVersion, WordPressDate};
pub use retry::RetryPolicy;
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
