// REST query-surface HTTP client.
//
// Wraps `reqwest::Client` with table-scoped URL construction, error-body
// parsing, and the `Prefer`/`Accept` header conventions of the hosted
// REST layer. Table endpoint modules (listings, profiles) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::query::Query;
use crate::transport::{TransportConfig, bearer};

/// `Accept` value selecting exactly one row; the server answers 406
/// when zero or several rows match.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// `Prefer` value asking mutations to echo the resulting row(s).
const RETURN_REPRESENTATION: &str = "return=representation";

/// Error body shape of the REST layer.
#[derive(Debug, serde::Deserialize)]
struct RestErrorBody {
    message: Option<String>,
    code: Option<String>,
}

/// Raw HTTP client for the hosted REST query surface.
///
/// All reads go through [`Query`] predicates; all mutations use the
/// `Prefer: return=representation` convention so callers get the stored
/// row back without a second round-trip. Per-request bearer overrides
/// carry the signed-in user's access token for row-level security.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client from a `TransportConfig`.
    ///
    /// `base_url` is the project root (e.g. `https://abc.supabase.co`);
    /// the `/rest/v1/` prefix is appended here.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a REST client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The project base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for a table: `{base}/rest/v1/{table}`.
    pub(crate) fn table_url(&self, table: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("rest/v1/{table}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET rows matching `query`. Returns the decoded row array.
    pub(crate) async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(%url, table, "GET rows");

        let mut req = self.http.get(url).query(&query.into_pairs());
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        self.decode(table, resp).await
    }

    /// GET exactly one row matching `query` via the single-object
    /// `Accept` header. A 406 becomes [`Error::RowNotFound`].
    pub(crate) async fn get_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
        access_token: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.table_url(table)?;
        debug!(%url, table, "GET single row");

        let mut req = self
            .http
            .get(url)
            .query(&query.into_pairs())
            .header(ACCEPT, SINGLE_OBJECT);
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        if resp.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(Error::RowNotFound { table: table.into() });
        }
        self.decode(table, resp).await
    }

    /// POST a new row, returning the stored representation.
    pub(crate) async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &impl Serialize,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(%url, table, "POST row");

        let mut req = self
            .http
            .post(url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        self.decode(table, resp).await
    }

    /// PATCH rows matching `query`, returning the stored representations.
    pub(crate) async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
        body: &impl Serialize,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(%url, table, "PATCH rows");

        let mut req = self
            .http
            .patch(url)
            .query(&query.into_pairs())
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        self.decode(table, resp).await
    }

    /// DELETE rows matching `query`, returning the deleted
    /// representations so callers can distinguish "deleted" from
    /// "matched nothing".
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(%url, table, "DELETE rows");

        let mut req = self
            .http
            .delete(url)
            .query(&query.into_pairs())
            .header("Prefer", RETURN_REPRESENTATION);
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        self.decode(table, resp).await
    }

    /// Decode a 2xx JSON body, or parse the REST error envelope.
    async fn decode<T: DeserializeOwned>(
        &self,
        table: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            return Err(self.rest_error(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{table}: {e}"),
            body,
        })
    }

    /// Parse the `{message, code}` error body, falling back to the raw
    /// text when the body isn't the expected shape.
    async fn rest_error(&self, resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<RestErrorBody>(&body) {
            Ok(parsed) => Error::Rest {
                message: parsed.message.unwrap_or_else(|| format!("HTTP {status}")),
                code: parsed.code,
                status,
            },
            Err(_) => Error::Rest {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                code: None,
                status,
            },
        }
    }
}
