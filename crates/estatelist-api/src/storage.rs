// Object storage HTTP client.
//
// Uploads listing images into a public bucket, derives their public
// URLs (a pure string operation, no network call), and removes objects
// on listing deletion. Removal failures are surfaced but documented as
// non-fatal for callers: the listing record wins.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{TransportConfig, bearer};

/// HTTP client for the hosted object store.
pub struct StorageClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StorageClient {
    /// Create a new storage client. `base_url` is the project root; the
    /// `/storage/v1/` prefix is appended here.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a storage client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn object_url(&self, bucket: &str, name: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("storage/v1/object/{bucket}/{name}"))?)
    }

    /// Upload an object. `x-upsert` stays off, so a name collision is
    /// rejected by the store (409) rather than silently overwriting.
    pub async fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
        access_token: Option<&str>,
    ) -> Result<(), Error> {
        let url = self.object_url(bucket, name)?;
        debug!(%url, size = bytes.len(), "POST object");

        let mut req = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "3600")
            .header("x-upsert", "false")
            .body(bytes);
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        Self::check(resp).await
    }

    /// Public URL for an object in a public bucket. Deterministic --
    /// no network call, no signing.
    pub fn public_url(&self, bucket: &str, name: &str) -> String {
        format!(
            "{}storage/v1/object/public/{bucket}/{name}",
            self.base_url
        )
    }

    /// Remove a single object. Callers treat failure as non-fatal.
    pub async fn remove(
        &self,
        bucket: &str,
        name: &str,
        access_token: Option<&str>,
    ) -> Result<(), Error> {
        let url = self.base_url.join(&format!("storage/v1/object/{bucket}"))?;
        debug!(%url, name, "DELETE object");

        let mut req = self
            .http
            .delete(url)
            .json(&serde_json::json!({ "prefixes": [name] }));
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        Self::check(resp).await
    }

    async fn check(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));

        Err(Error::Storage {
            message,
            status: status.as_u16(),
        })
    }
}
