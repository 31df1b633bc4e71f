use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::QuoteGateway;
use super::error::GatewayError;
use super::types::{
    AcceptQuoteRequest, ActionResponse, FetchQuoteRequest, QuoteData, RequestRevisionRequest,
    normalize_quote_response,
};

pub const DEFAULT_API_BASE: &str = "https://automation.osi.vn";

const FETCH_QUOTE_PATH: &str = "/webhook/quote";
const ACCEPT_QUOTE_PATH: &str = "/webhook/accept-quote";
const REQUEST_REVISION_PATH: &str = "/webhook/request-to-adjust";

/// HTTP implementation of [`QuoteGateway`] against the webhook service.
///
/// Every operation is a single round trip with no retry. Retries
/// are always initiated by the user.
#[derive(Debug, Clone)]
pub struct QuoteServiceClient {
    client: Client,
    base_url: String,
}

impl QuoteServiceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_timeouts(base_url, Duration::from_secs(10), Duration::from_secs(30))
    }

    /// Create a client with explicit connect / whole-request timeouts.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, GatewayError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "posting to quote service");
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;
        debug!(%url, status = response.status().as_u16(), "quote service responded");
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "quote service returned a non-JSON body");
            GatewayError::Malformed {
                message: Some(format!("invalid JSON body: {e}")),
            }
        })
    }

    async fn transport_error(response: Response) -> GatewayError {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        GatewayError::Transport {
            status: Some(status.as_u16()),
            message,
        }
    }

    async fn send_action<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ActionResponse, GatewayError> {
        let response = self.post_json(path, body).await?;
        if !response.status().is_success() {
            let err = Self::transport_error(response).await;
            warn!(path, error = %err, "quote action failed");
            return Err(err);
        }
        Self::read_json(response).await
    }
}

/// The identifier is an opaque key: blank input is rejected, anything else is
/// forwarded exactly as given.
fn require_record_id(record_id: &str) -> Result<&str, GatewayError> {
    if record_id.trim().is_empty() {
        return Err(GatewayError::ValidationFailed(
            "record identifier must not be empty".to_string(),
        ));
    }
    Ok(record_id)
}

impl QuoteGateway for QuoteServiceClient {
    async fn fetch_quote(&self, record_id: &str) -> Result<QuoteData, GatewayError> {
        let record_id = require_record_id(record_id)?;
        let req = FetchQuoteRequest {
            id: record_id.to_string(),
        };
        let response = self.post_json(FETCH_QUOTE_PATH, &req).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound {
                record_id: record_id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Self::transport_error(response).await);
        }

        let body: serde_json::Value = Self::read_json(response).await?;
        normalize_quote_response(body)
    }

    async fn accept_quote(&self, record_id: &str) -> Result<ActionResponse, GatewayError> {
        let record_id = require_record_id(record_id)?;
        let req = AcceptQuoteRequest {
            quote_record_id: record_id.to_string(),
        };
        self.send_action(ACCEPT_QUOTE_PATH, &req).await
    }

    async fn request_revision(
        &self,
        record_id: &str,
        message: &str,
    ) -> Result<ActionResponse, GatewayError> {
        let record_id = require_record_id(record_id)?;
        let content = message.trim();
        if content.is_empty() {
            return Err(GatewayError::ValidationFailed(
                "revision message must not be empty".to_string(),
            ));
        }
        let req = RequestRevisionRequest {
            quote_record_id: record_id.to_string(),
            content: content.to_string(),
        };
        self.send_action(REQUEST_REVISION_PATH, &req).await
    }
}
