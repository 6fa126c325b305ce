// ── Core error types ──
//
// User-facing errors from estatelist-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<estatelist_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

use crate::model::ListingId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection / auth errors ─────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("You must be signed in to do that")]
    NotSignedIn,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Listing not found: {id}")]
    ListingNotFound { id: ListingId },

    #[error("Profile not found for the current user")]
    ProfileNotFound,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("You are not the owner of this listing")]
    NotOwner,

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Backend error: {message}")]
    Api {
        message: String,
        /// Backend-specific error code (e.g. `PGRST116`), if any.
        code: Option<String>,
        /// HTTP status code, if applicable.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<estatelist_api::Error> for CoreError {
    fn from(err: estatelist_api::Error) -> Self {
        match err {
            estatelist_api::Error::Auth { message } => CoreError::AuthenticationFailed { message },
            estatelist_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- please sign in again".into(),
            },
            estatelist_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            estatelist_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            estatelist_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            estatelist_api::Error::Rest { message, code, status } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            estatelist_api::Error::RowNotFound { table } => CoreError::Api {
                message: format!("No matching row in {table}"),
                code: None,
                status: Some(406),
            },
            estatelist_api::Error::Storage { message, status } => CoreError::Api {
                message: format!("Storage: {message}"),
                code: None,
                status: Some(status),
            },
            estatelist_api::Error::Function { name, message, status } => CoreError::Api {
                message: format!("{name}: {message}"),
                code: None,
                status: Some(status),
            },
            estatelist_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
