use thiserror::Error;

pub use crate::document::DocumentError;
pub use crate::gateway::GatewayError;
pub use crate::workflow::WorkflowError;

/// Any failure the quote view can run into. None of them is fatal to the
/// process; the front end renders [`ViewerError::user_message`].
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Quote service error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    pub fn user_message(&self) -> String {
        match self {
            ViewerError::Gateway(e) => e.user_message(),
            ViewerError::Document(e) => e.user_message(),
            ViewerError::Workflow(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_component_errors() {
        let err: ViewerError = GatewayError::NotFound {
            record_id: "x".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Quote service error: quote not found: x");
        assert!(err.user_message().contains("could not be found"));

        let err: ViewerError = DocumentError::NoArtifact.into();
        assert_eq!(err.to_string(), "Document error: no document attached to this quote");
    }

    #[test]
    fn io_failure_keeps_its_cause() {
        let err: ViewerError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only directory").into();
        assert!(matches!(err, ViewerError::Io(_)));
        assert_eq!(err.user_message(), "IO error: read-only directory");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ViewerError>();
    }
}
