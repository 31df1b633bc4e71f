mod error;
mod machine;
mod state;

pub use error::{Rejection, WorkflowError};
pub use machine::QuoteWorkflow;
pub use state::{Action, ActionRequest, Pending, Settled, Workflow, WorkflowState};
