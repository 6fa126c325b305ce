// Token auth HTTP client.
//
// Wraps the hosted auth service's password-grant flow: sign-up,
// sign-in, token refresh, sign-out, and current-user lookup. Tokens are
// opaque to this crate; lifecycle policy (when to refresh, what state
// to publish) lives in estatelist-core's SessionTracker.

use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::Error;
use crate::transport::{TransportConfig, bearer};

/// A user record as returned by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// An issued token pair plus the authenticated user.
///
/// `expires_at` is computed client-side from `expires_in` at decode
/// time; the service's own `expires_at` field is not present on all
/// deployments.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: AuthUser,
}

impl From<TokenResponse> for TokenPair {
    fn from(resp: TokenResponse) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at: Utc::now() + Duration::seconds(resp.expires_in),
            user: resp.user,
        }
    }
}

/// Error body shapes of the auth service. Older endpoints answer
/// `{msg}`, newer ones `{error, error_description}`.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    msg: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl AuthErrorBody {
    fn message(self, status: u16) -> String {
        self.error_description
            .or(self.msg)
            .or(self.error)
            .unwrap_or_else(|| format!("HTTP {status}"))
    }
}

/// HTTP client for the hosted auth service.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// Create a new auth client. `base_url` is the project root; the
    /// `/auth/v1/` prefix is appended here.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create an auth client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn auth_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("auth/v1/{path}"))?)
    }

    // ── Flows ────────────────────────────────────────────────────────

    /// Register a new account. Deployments without email confirmation
    /// return a full token pair immediately.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<TokenPair, Error> {
        let url = self.auth_url("signup")?;
        debug!(%url, "POST sign-up");

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode_token(resp).await
    }

    /// Sign in with the password grant.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenPair, Error> {
        let url = self.auth_url("token?grant_type=password")?;
        debug!("POST password grant");

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode_token(resp).await
    }

    /// Exchange a refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        let url = self.auth_url("token?grant_type=refresh_token")?;
        debug!("POST refresh grant");

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode_token(resp).await
    }

    /// Revoke the session behind `access_token`. A 401 here means the
    /// token was already dead -- treated as success.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
        let url = self.auth_url("logout")?;
        debug!(%url, "POST sign-out");

        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, bearer(access_token))
            .send()
            .await
            .map_err(Error::Transport)?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Ok(()),
            _ => Err(Self::auth_error(resp).await),
        }
    }

    /// Fetch the user behind `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, Error> {
        let url = self.auth_url("user")?;
        debug!(%url, "GET current user");

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, bearer(access_token))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            return Err(Self::auth_error(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("auth user: {e}"),
            body,
        })
    }

    // ── Decoding ─────────────────────────────────────────────────────

    async fn decode_token(resp: reqwest::Response) -> Result<TokenPair, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::auth_error(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("token response: {e}"),
                body,
            })?;
        Ok(token.into())
    }

    async fn auth_error(resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthErrorBody>(&body)
            .map(|b| b.message(status))
            .unwrap_or_else(|_| format!("HTTP {status}"));
        Error::Auth { message }
    }
}
