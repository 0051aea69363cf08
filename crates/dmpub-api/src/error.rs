use thiserror::Error;

/// Top-level error type for the `dmpub-api` crate.
///
/// Covers every failure mode on the wire: token negotiation, the
/// downloads/versions endpoints, transport, and payload decoding.
/// `dmpub-core` maps these into the publishing error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by the token endpoint (any non-2xx below 500).
    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// The token endpoint answered with a 5xx status.
    #[error("Server error from {endpoint} (HTTP {status}): {message}")]
    ServerError {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// A retryable failure persisted through every allowed attempt.
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<Error>,
    },

    // ── Downloads / versions ────────────────────────────────────────
    /// Non-2xx response from a list or create call.
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::ServerError { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::RetriesExhausted { last, .. } => last.status(),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for server-side transient failures (HTTP 5xx).
    ///
    /// Client errors and requests that never got a response are not
    /// transient: retrying them cannot change the outcome.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ServerError { status, .. } | Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the credentials were rejected.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

/// Short human-readable message for a failed response: the canonical
/// reason phrase plus a preview of the body.
pub(crate) fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let body = body.trim();
    if body.is_empty() {
        reason.to_owned()
    } else {
        let preview: String = body.chars().take(200).collect();
        format!("{reason}: {preview}")
    }
}
