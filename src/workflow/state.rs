use std::fmt;

use serde::{Deserialize, Serialize};

/// The three workflow states a quote can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Pending,
    Confirmed,
    RevisionRequested,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkflowState::Pending)
    }

    /// Customer-facing badge text.
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowState::Pending => "Awaiting confirmation",
            WorkflowState::Confirmed => "Confirmed",
            WorkflowState::RevisionRequested => "Revision requested",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::Pending => write!(f, "pending"),
            WorkflowState::Confirmed => write!(f, "confirmed"),
            WorkflowState::RevisionRequested => write!(f, "revision_requested"),
        }
    }
}

/// A user action on a pending quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Confirm,
    Revise { message: String },
}

impl Action {
    pub fn revise(message: impl Into<String>) -> Self {
        Action::Revise {
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Confirm => "confirm",
            Action::Revise { .. } => "revise",
        }
    }
}

/// One submission handed to the gateway; discarded once it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub record_id: String,
    pub action: Action,
}

/// Proof that a quote has not been actioned yet. Only this state can
/// transition, and doing so consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct Pending {
    _private: (),
}

impl Pending {
    fn new() -> Self {
        Self { _private: () }
    }

    pub fn confirm(self) -> Settled {
        Settled::Confirmed
    }

    pub fn request_revision(self, message: String) -> Settled {
        Settled::RevisionRequested { message }
    }

    fn settle(self, action: Action) -> Settled {
        match action {
            Action::Confirm => self.confirm(),
            Action::Revise { message } => self.request_revision(message),
        }
    }
}

/// A terminal outcome. Has no transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Confirmed,
    RevisionRequested { message: String },
}

/// Workflow of one open quote: pending until exactly one action succeeds.
#[derive(Debug, PartialEq, Eq)]
pub enum Workflow {
    Pending(Pending),
    Settled(Settled),
}

impl Default for Workflow {
    fn default() -> Self {
        Workflow::Pending(Pending::new())
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        match self {
            Workflow::Pending(_) => WorkflowState::Pending,
            Workflow::Settled(Settled::Confirmed) => WorkflowState::Confirmed,
            Workflow::Settled(Settled::RevisionRequested { .. }) => {
                WorkflowState::RevisionRequested
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Workflow::Pending(_))
    }

    /// Apply a successful action. A settled workflow is handed back unchanged.
    pub fn settle(self, action: Action) -> Result<Workflow, Workflow> {
        match self {
            Workflow::Pending(pending) => Ok(Workflow::Settled(pending.settle(action))),
            settled @ Workflow::Settled(_) => Err(settled),
        }
    }
}
