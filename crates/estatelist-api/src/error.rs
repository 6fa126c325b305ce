use thiserror::Error;

/// Top-level error type for the `estatelist-api` crate.
///
/// Covers every failure mode across all backend surfaces: auth, the
/// REST query surface, object storage, and edge functions.
/// `estatelist-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Sign-in or sign-up rejected (wrong credentials, duplicate email, etc.)
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Access token expired or revoked; a refresh may resolve it.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── REST query surface ──────────────────────────────────────────
    /// Structured error from the REST layer (parsed from the
    /// `{message, code, details, hint}` error body).
    #[error("REST API error (HTTP {status}): {message}")]
    Rest {
        message: String,
        code: Option<String>,
        status: u16,
    },

    /// A `.single()` query matched no rows.
    #[error("Row not found in {table}")]
    RowNotFound { table: String },

    // ── Object storage ──────────────────────────────────────────────
    /// Upload or removal rejected by the object store.
    #[error("Storage error (HTTP {status}): {message}")]
    Storage { message: String, status: u16 },

    // ── Edge functions ──────────────────────────────────────────────
    /// Non-2xx response from an edge function (parsed from `{error}`).
    #[error("Function '{name}' failed (HTTP {status}): {message}")]
    Function {
        name: String,
        message: String,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::SessionExpired => true,
            Self::Rest { status: 401, .. } | Self::Storage { status: 401, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Rest { status: 404 | 406, .. } => true,
            Self::RowNotFound { .. } => true,
            _ => false,
        }
    }

    /// Extract the REST error code (e.g. `PGRST116`), if available.
    pub fn rest_error_code(&self) -> Option<&str> {
        match self {
            Self::Rest { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
