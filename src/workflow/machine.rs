use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};

use super::error::{Rejection, WorkflowError};
use super::state::{Action, ActionRequest, Workflow, WorkflowState};
use crate::gateway::{GatewayError, QuoteGateway};
use crate::view::WorkflowObserver;

/// Drives one quote's workflow through the gateway.
///
/// The machine belongs to a single view on a single-threaded executor, so it
/// uses `Cell`/`RefCell` rather than locks. Both entry points take `&self` and
/// are serialized by one in-flight flag: a dispatch attempted while another is
/// suspended is rejected, not queued. No `RefCell` borrow is held across an
/// await.
pub struct QuoteWorkflow<G> {
    gateway: G,
    record_id: String,
    workflow: RefCell<Workflow>,
    in_flight: Cell<bool>,
    closed: Cell<bool>,
    draft: RefCell<String>,
    observer: Option<Box<dyn WorkflowObserver>>,
}

/// Clears the in-flight flag when the dispatch finishes or is abandoned.
struct InFlightGuard<'a>(&'a Cell<bool>);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<G: QuoteGateway> QuoteWorkflow<G> {
    pub fn new(gateway: G, record_id: impl Into<String>) -> Self {
        Self {
            gateway,
            record_id: record_id.into(),
            workflow: RefCell::new(Workflow::new()),
            in_flight: Cell::new(false),
            closed: Cell::new(false),
            draft: RefCell::new(String::new()),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl WorkflowObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn state(&self) -> WorkflowState {
        self.workflow.borrow().state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Whether the view should offer the confirm / revise actions.
    pub fn can_dispatch(&self) -> bool {
        self.state() == WorkflowState::Pending && !self.in_flight.get() && !self.closed.get()
    }

    /// The revision text the user is composing.
    pub fn draft(&self) -> String {
        self.draft.borrow().clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        *self.draft.borrow_mut() = text.into();
    }

    /// Stop applying results. Any dispatch still suspended is discarded when
    /// it resumes.
    pub fn close(&self) {
        self.closed.set(true);
    }

    pub async fn confirm(&self) -> Result<WorkflowState, WorkflowError> {
        self.dispatch(Action::Confirm).await
    }

    /// Request a revision using the current draft.
    pub async fn submit_revision(&self) -> Result<WorkflowState, WorkflowError> {
        let message = self.draft();
        self.dispatch(Action::revise(message)).await
    }

    /// Run `action` against the service and transition on success.
    ///
    /// Local rejections (already settled, in flight, closed, empty revision
    /// message) never reach the network. A gateway failure leaves the state and
    /// the draft untouched so the user can retry.
    pub async fn dispatch(&self, action: Action) -> Result<WorkflowState, WorkflowError> {
        if self.closed.get() {
            return Err(Rejection::Closed.into());
        }
        let state = self.state();
        if state.is_terminal() {
            debug!(action = action.name(), %state, "dispatch rejected: already settled");
            return Err(Rejection::AlreadySettled(state).into());
        }
        if self.in_flight.get() {
            debug!(action = action.name(), "dispatch rejected: in flight");
            return Err(Rejection::InFlight.into());
        }

        let action = match action {
            Action::Revise { message } => {
                let trimmed = message.trim();
                if trimmed.is_empty() {
                    return Err(WorkflowError::ValidationFailed(
                        "revision message must not be empty".to_string(),
                    ));
                }
                Action::revise(trimmed)
            }
            confirm => confirm,
        };

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return Err(Rejection::InFlight.into());
        };

        let request = ActionRequest {
            record_id: self.record_id.clone(),
            action,
        };
        info!(
            record_id = %request.record_id,
            action = request.action.name(),
            "dispatching quote action"
        );

        let result = match &request.action {
            Action::Confirm => self.gateway.accept_quote(&request.record_id).await,
            Action::Revise { message } => {
                self.gateway
                    .request_revision(&request.record_id, message)
                    .await
            }
        };

        if let Err(err) = result {
            warn!(
                record_id = %request.record_id,
                action = request.action.name(),
                error = %err,
                "quote action failed"
            );
            return Err(match err {
                GatewayError::ValidationFailed(m) => WorkflowError::ValidationFailed(m),
                other => WorkflowError::Gateway(other),
            });
        }

        // The view may have gone away while the request was suspended.
        if self.closed.get() {
            debug!(record_id = %request.record_id, "discarding action result for closed view");
            return Err(Rejection::Closed.into());
        }

        let next = {
            let mut workflow = self.workflow.borrow_mut();
            let current = std::mem::take(&mut *workflow);
            match current.settle(request.action.clone()) {
                Ok(next) => {
                    *workflow = next;
                    workflow.state()
                }
                Err(settled) => {
                    let state = settled.state();
                    *workflow = settled;
                    return Err(Rejection::AlreadySettled(state).into());
                }
            }
        };
        info!(record_id = %request.record_id, state = %next, "quote workflow settled");

        match &request.action {
            Action::Confirm => {
                if let Some(observer) = &self.observer {
                    observer.on_confirmed();
                }
            }
            Action::Revise { message } => {
                self.draft.borrow_mut().clear();
                if let Some(observer) = &self.observer {
                    observer.on_revision_requested(message);
                }
            }
        }

        Ok(next)
    }
}
