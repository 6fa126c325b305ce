//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use estatelist_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(estatelist::connection_failed),
        help("Check your network and the project_url in your profile.")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(code(estatelist::timeout), help("Try again, or raise --timeout."))]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(estatelist::auth_failed),
        help("Check your email and password, then run: estatelist auth login")
    )]
    AuthFailed { message: String },

    #[error("You are not signed in")]
    #[diagnostic(
        code(estatelist::not_signed_in),
        help("Run: estatelist auth login --email <you@example.com>")
    )]
    NotSignedIn,

    // ── Resources ────────────────────────────────────────────────────
    #[error("Listing '{id}' not found")]
    #[diagnostic(
        code(estatelist::not_found),
        help("List available listings with: estatelist listings list")
    )]
    ListingNotFound { id: String },

    #[error("You are not the owner of this listing")]
    #[diagnostic(code(estatelist::not_owner))]
    NotOwner,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(estatelist::validation))]
    Validation { field: String, reason: String },

    #[error("Could not read {path}: {reason}")]
    #[diagnostic(code(estatelist::io))]
    FileRead { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error")]
    #[diagnostic(
        code(estatelist::config),
        help("Create a profile in the config file; see: estatelist config path")
    )]
    Config(#[from] estatelist_config::ConfigError),

    // ── Everything else ──────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(estatelist::backend))]
    Backend(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotSignedIn => exit_code::AUTH,
            Self::ListingNotFound { .. } => exit_code::NOT_FOUND,
            Self::NotOwner => exit_code::PERMISSION,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { .. } => Self::Timeout,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotSignedIn => Self::NotSignedIn,
            CoreError::ListingNotFound { id } => Self::ListingNotFound { id: id.to_string() },
            CoreError::NotOwner => Self::NotOwner,
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            other => Self::Backend(other.to_string()),
        }
    }
}
