//! Error types for the remote quote service.
//!
//! [`GatewayError`] is the discriminated failure value returned by every
//! [`QuoteGateway`](super::QuoteGateway) operation. None of the variants are
//! fatal: the view renders [`GatewayError::user_message`] and lets the user
//! re-trigger the same operation.

use thiserror::Error;

/// Failures raised while talking to the remote quote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The service does not know the record identifier (HTTP 404).
    #[error("quote not found: {record_id}")]
    NotFound { record_id: String },

    /// Network failure or a non-success HTTP status.
    /// `status` is `None` when the request never produced a response
    /// (DNS, connection refused, timeout).
    #[error("transport error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Transport { status: Option<u16>, message: String },

    /// The response arrived but its shape or `status` field was unexpected.
    /// Carries the server-supplied message when there was one.
    #[error("malformed response: {}", .message.as_deref().unwrap_or("unexpected response shape"))]
    Malformed { message: Option<String> },

    /// Input rejected locally, before any network call.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

impl GatewayError {
    /// HTTP status carried by a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Transport { status, .. } => *status,
            GatewayError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Short message suitable for showing to the customer.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::NotFound { .. } => {
                "This quote could not be found. Check the link and try again.".to_string()
            }
            GatewayError::Transport { .. } => {
                "The quote service could not be reached. Please try again later.".to_string()
            }
            GatewayError::Malformed { message: Some(m) } => m.clone(),
            GatewayError::Malformed { message: None } => {
                "The quote service returned an unexpected response.".to_string()
            }
            GatewayError::ValidationFailed(m) => m.clone(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_display_with_status() {
        let err = GatewayError::Transport {
            status: Some(502),
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "transport error (status 502): Bad Gateway");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn transport_display_without_status() {
        let err = GatewayError::Transport {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn malformed_prefers_server_message() {
        let err = GatewayError::Malformed {
            message: Some("Quote expired".into()),
        };
        assert_eq!(err.to_string(), "malformed response: Quote expired");
        assert_eq!(err.user_message(), "Quote expired");

        let bare = GatewayError::Malformed { message: None };
        assert_eq!(bare.to_string(), "malformed response: unexpected response shape");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GatewayError>();
    }
}
