//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use dmpub_config::ConfigError;
use dmpub_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const UPSTREAM: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(dmpub::connection_failed),
        help(
            "Check that the site is reachable and serves HTTPS.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Site unavailable after {attempts} attempts (HTTP {status})")]
    #[diagnostic(
        code(dmpub::server_unavailable),
        help("The token endpoint kept failing with server errors. Try again later.\n{message}")
    )]
    ServerUnavailable {
        attempts: u32,
        status: u16,
        message: String,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(dmpub::auth_failed),
        help(
            "Verify the WordPress username and password.\n\
             Run: dmpub config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(dmpub::no_credentials),
        help(
            "Configure credentials with: dmpub config init\n\
             Or set DMPUB_USERNAME and DMPUB_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{endpoint} failed (HTTP {status}): {message}")]
    #[diagnostic(code(dmpub::upstream))]
    Upstream {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from site: {message}")]
    #[diagnostic(
        code(dmpub::unexpected_response),
        help("Check that the REST plugin is installed and --flavor matches it.")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dmpub::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(dmpub::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: dmpub config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No site configured")]
    #[diagnostic(
        code(dmpub::no_config),
        help(
            "Create a profile with: dmpub config init\n\
             Or pass --site. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(dmpub::config))]
    Config { message: String },

    #[error("Interactive prompt failed: {0}")]
    #[diagnostic(code(dmpub::prompt))]
    Prompt(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ServerUnavailable { .. }
            | Self::Upstream { .. }
            | Self::UnexpectedResponse { .. } => exit_code::UPSTREAM,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            Self::Config { .. } | Self::Prompt(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Attach the active profile to authentication failures.
    pub fn with_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: name.into(),
                message,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::AuthenticationFailed { message, .. } => CliError::AuthFailed {
                profile: "default".into(),
                message,
            },

            CoreError::ServerUnavailable {
                attempts,
                status,
                message,
            } => CliError::ServerUnavailable {
                attempts,
                status,
                message,
            },

            CoreError::NotAuthenticated => CliError::AuthFailed {
                profile: "default".into(),
                message: "no active session".into(),
            },

            CoreError::Upstream {
                endpoint,
                status,
                message,
            } => CliError::Upstream {
                endpoint,
                status,
                message,
            },

            CoreError::UnexpectedResponse { message } => CliError::UnexpectedResponse { message },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
