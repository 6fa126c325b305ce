// Shared transport configuration for building reqwest::Client instances.
//
// The REST, auth, storage, and functions clients all share timeout and
// default-header settings through this module, avoiding duplicated
// builder logic. Every request to the backend carries the project
// `apikey` header plus a bearer token (the anon key until a user signs
// in, the session access token afterwards).

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Header carrying the project API key on every request.
pub const APIKEY_HEADER: &str = "apikey";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Project anon key, sent as `apikey` and as the default bearer.
    pub anon_key: SecretString,
    pub timeout: Duration,
}

impl TransportConfig {
    pub fn new(anon_key: SecretString) -> Self {
        Self {
            anon_key,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` carrying the project key headers.
    ///
    /// The `Authorization` header set here is the anon-key fallback;
    /// authenticated calls override it per-request with the session's
    /// access token.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(APIKEY_HEADER, self.header_value(self.anon_key.expose_secret())?);
        headers.insert(
            AUTHORIZATION,
            self.header_value(&format!("Bearer {}", self.anon_key.expose_secret()))?,
        );

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("estatelist/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)
    }

    fn header_value(&self, value: &str) -> Result<HeaderValue, Error> {
        let mut hv = HeaderValue::from_str(value).map_err(|_| Error::Auth {
            message: "project key contains invalid header characters".into(),
        })?;
        hv.set_sensitive(true);
        Ok(hv)
    }
}

/// Render a bearer `Authorization` value for a per-request override.
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
