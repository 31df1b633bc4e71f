use thiserror::Error;

/// Why a document could not be shown inline.
///
/// Every variant is recoverable: the view still offers the fallback actions
/// (open the original externally, download the original).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Network failure or non-success HTTP status. `status` is `None` when no
    /// response was received.
    #[error("document request failed{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport { status: Option<u16>, message: String },

    /// The response did not declare the expected binary format.
    #[error("unexpected document type: {}", .content_type.as_deref().unwrap_or("none declared"))]
    UnexpectedKind { content_type: Option<String> },

    /// The quote has no real artifact configured.
    #[error("no document attached to this quote")]
    NoArtifact,

    /// The retrieval's generation was superseded before it finished.
    /// Never shown to the user; the result is discarded.
    #[error("document retrieval superseded")]
    Superseded,
}

impl DocumentError {
    pub fn transport(status: u16) -> Self {
        DocumentError::Transport {
            status: Some(status),
            message: format!("HTTP {status}"),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DocumentError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            DocumentError::NoArtifact => {
                "No document is attached to this quote yet.".to_string()
            }
            other => format!(
                "The document could not be displayed here ({other}). Open or download the original instead."
            ),
        }
    }
}

impl From<reqwest::Error> for DocumentError {
    fn from(err: reqwest::Error) -> Self {
        DocumentError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_display() {
        assert_eq!(
            DocumentError::transport(404).to_string(),
            "document request failed (HTTP 404): HTTP 404"
        );
        assert_eq!(DocumentError::transport(404).status(), Some(404));
    }

    #[test]
    fn unexpected_kind_display() {
        let err = DocumentError::UnexpectedKind {
            content_type: Some("text/html".into()),
        };
        assert_eq!(err.to_string(), "unexpected document type: text/html");
        let none = DocumentError::UnexpectedKind { content_type: None };
        assert_eq!(none.to_string(), "unexpected document type: none declared");
    }

    #[test]
    fn user_message_points_to_fallback() {
        assert!(
            DocumentError::transport(500)
                .user_message()
                .contains("download the original")
        );
        assert_eq!(
            DocumentError::NoArtifact.user_message(),
            "No document is attached to this quote yet."
        );
    }
}
