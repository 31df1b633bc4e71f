//! Wire records for the quote service webhooks.
//!
//! Request bodies serialize to the exact JSON keys the webhooks expect
//! (including the hyphenated `quote-record-id`). Response records are
//! deserialized leniently: optional fields default instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::GatewayError;

/// Body of `POST /webhook/quote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchQuoteRequest {
    pub id: String,
}

/// Body of `POST /webhook/accept-quote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptQuoteRequest {
    #[serde(rename = "quote-record-id")]
    pub quote_record_id: String,
}

/// Body of `POST /webhook/request-to-adjust`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRevisionRequest {
    #[serde(rename = "quote-record-id")]
    pub quote_record_id: String,
    pub content: String,
}

/// The artifact attached to a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteFileInfo {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_url: String,
}

/// The `data` record of a successful `fetch-quote` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteData {
    /// Display code, e.g. "QT-2025-001".
    pub quote_code: String,
    /// ISO date or timestamp.
    pub quote_date: String,
    /// ISO date or timestamp.
    pub valid_until: String,
    pub customer_name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub personal_email: String,
    #[serde(default)]
    pub company_email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sale_note: Option<String>,
    pub quote_file: QuoteFileInfo,
    /// Opaque identifier used for the accept / request-to-adjust calls.
    pub record_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Envelope shared by every webhook response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Response of the accept / request-to-adjust webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Status value the service uses to flag a usable `fetch-quote` response.
pub const SUCCESS_STATUS: &str = "success";

/// Normalizes a raw `fetch-quote` body into its `data` record.
///
/// Accepts a bare envelope or a one-element array wrapping one. Any other
/// shape, or an envelope whose `status` is not `"success"`, is `Malformed`.
pub fn normalize_quote_response(body: Value) -> Result<QuoteData, GatewayError> {
    let envelope = match body {
        Value::Object(_) => body,
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        Value::Array(items) => {
            return Err(GatewayError::Malformed {
                message: Some(format!("expected one quote record, got {}", items.len())),
            });
        }
        _ => return Err(GatewayError::Malformed { message: None }),
    };

    // Read the message before the status so a failing envelope still reports it.
    let message = envelope
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string);

    let response: QuoteResponse =
        serde_json::from_value(envelope).map_err(|_| GatewayError::Malformed {
            message: message.clone(),
        })?;

    if response.status != SUCCESS_STATUS {
        return Err(GatewayError::Malformed { message });
    }

    let data = response.data.ok_or_else(|| GatewayError::Malformed {
        message: Some("response is missing the quote data".to_string()),
    })?;

    serde_json::from_value(data).map_err(|e| GatewayError::Malformed {
        message: Some(format!("invalid quote data: {e}")),
    })
}
