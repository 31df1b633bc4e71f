use thiserror::Error;

use super::state::WorkflowState;
use crate::gateway::GatewayError;

/// Why a dispatch was refused without contacting the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("quote is already {0}")]
    AlreadySettled(WorkflowState),

    #[error("another action is still in progress")]
    InFlight,

    #[error("quote view has been closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("action rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("remote action failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl WorkflowError {
    /// Whether re-triggering the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkflowError::Gateway(_) | WorkflowError::Rejected(Rejection::InFlight)
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Rejected(Rejection::AlreadySettled(state)) => {
                format!("This quote is already {}.", state.label().to_lowercase())
            }
            WorkflowError::Rejected(Rejection::InFlight) => {
                "Please wait for the current request to finish.".to_string()
            }
            WorkflowError::Rejected(Rejection::Closed) => {
                "This quote is no longer open.".to_string()
            }
            WorkflowError::ValidationFailed(m) => m.clone(),
            WorkflowError::Gateway(_) => {
                "The request could not be sent. Please try again later.".to_string()
            }
        }
    }
}
