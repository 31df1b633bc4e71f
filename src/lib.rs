//! Quote viewer core.
//!
//! Opens a quote by record identifier, retrieves its document into a
//! process-local resource, and drives the one-shot confirmation workflow
//! against the remote quote service.
//!
//! - [`gateway`]: the three remote operations and their wire records.
//! - [`document`]: artifact retrieval and the local resource registry.
//! - [`lifecycle`]: generation-scoped ownership of the document handle.
//! - [`workflow`]: the pending → confirmed / revision requested state machine.
//! - [`session`]: the pieces above wired for one open quote.

pub mod config;
pub mod document;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod quote;
pub mod session;
pub mod view;
pub mod workflow;

pub use error::ViewerError;
