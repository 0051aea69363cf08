// ── Core error types ──
//
// The publishing error taxonomy. Consumers never match on reqwest errors
// or raw JSON failures; the `From<dmpub_api::Error>` impl classifies
// wire-level failures into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// HTTP status of the rejection, if the server answered.
        status: Option<u16>,
        message: String,
    },

    #[error("Server unavailable after {attempts} attempts (HTTP {status}): {message}")]
    ServerUnavailable {
        attempts: u32,
        status: u16,
        message: String,
    },

    #[error("Not authenticated -- call authenticate() before publishing")]
    NotAuthenticated,

    // ── Remote errors ────────────────────────────────────────────────
    #[error("{endpoint} failed (HTTP {status}): {message}")]
    Upstream {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Reject `value` if it is empty after trimming whitespace.
    pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            Err(Self::validation(field, "must be a non-empty string"))
        } else {
            Ok(())
        }
    }
}

// ── Conversion from wire-level errors ────────────────────────────────

impl From<dmpub_api::Error> for CoreError {
    fn from(err: dmpub_api::Error) -> Self {
        use dmpub_api::Error as Api;

        match err {
            Api::Authentication { status, message } => CoreError::AuthenticationFailed {
                status: Some(status),
                message,
            },

            Api::ServerError {
                status, message, ..
            } => CoreError::ServerUnavailable {
                attempts: 1,
                status,
                message,
            },

            Api::RetriesExhausted { attempts, last } => CoreError::ServerUnavailable {
                attempts,
                status: last.status().unwrap_or_default(),
                message: last.to_string(),
            },

            Api::Api {
                endpoint,
                status,
                message,
            } => CoreError::Upstream {
                endpoint,
                status,
                message,
            },

            Api::Transport(e) => {
                let url = e.url().map(ToString::to_string).unwrap_or_default();
                let reason = if e.is_timeout() {
                    "request timed out".to_owned()
                } else {
                    e.to_string()
                };
                CoreError::ConnectionFailed { url, reason }
            }

            Api::InvalidUrl(e) => CoreError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            Api::Tls(message) => CoreError::Config { message },

            Api::Deserialization { message, .. } => CoreError::UnexpectedResponse { message },
        }
    }
}
