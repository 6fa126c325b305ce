// Edge function invocation.
//
// The two serverless collaborators -- payment-intent creation and the
// contact-email relay -- are plain JSON-over-POST endpoints. Their
// request/response contracts are modeled here; their implementations
// live server-side and are out of scope.

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{TransportConfig, bearer};

/// Request body for `create-payment-intent`.
///
/// `amount` is in integer minor-units (cents) and must be positive;
/// the function rejects anything else with a 400.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentIntent {
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "listingId")]
    pub listing_id: String,
}

/// Successful response from `create-payment-intent`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// Request body for the contact-email relay.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Error body of a failed function call.
#[derive(Debug, Deserialize)]
struct FunctionErrorBody {
    error: Option<String>,
}

/// HTTP client for the project's edge functions.
pub struct FunctionsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FunctionsClient {
    /// Create a new functions client. `base_url` is the project root;
    /// the `/functions/v1/` prefix is appended here.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a functions client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Invoke a function by name with a JSON body.
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        name: &str,
        body: &impl Serialize,
        access_token: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.base_url.join(&format!("functions/v1/{name}"))?;
        debug!(%url, name, "POST function");

        let mut req = self.http.post(url).json(body);
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<FunctionErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::Function {
                name: name.into(),
                message,
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::Deserialization {
            message: format!("function {name}: {e}"),
            body: text,
        })
    }

    /// Create a payment intent for a listing purchase.
    pub async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntent,
        access_token: Option<&str>,
    ) -> Result<PaymentIntent, Error> {
        self.invoke("create-payment-intent", request, access_token).await
    }

    /// Relay a contact-form message. The function has no documented
    /// success schema beyond 2xx, so the body is discarded.
    pub async fn send_contact(
        &self,
        message: &ContactMessage,
        access_token: Option<&str>,
    ) -> Result<(), Error> {
        let name = "contact-email";
        let url = self.base_url.join(&format!("functions/v1/{name}"))?;
        debug!(%url, "POST contact relay");

        let mut req = self.http.post(url).json(message);
        if let Some(token) = access_token {
            req = req.header(AUTHORIZATION, bearer(token));
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<FunctionErrorBody>(&text)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(Error::Function {
            name: name.into(),
            message,
            status: status.as_u16(),
        })
    }
}
