//! One open quote, wired the way a view consumes it.
//!
//! [`QuoteSession::open`] fetches the quote record, after which the document
//! can be resolved and the workflow dispatched. Closing the session releases
//! the document handle; dropping it does the same through the lifecycle
//! manager.

use tracing::info;

use crate::document::{DocumentFetcher, ResourceHandle};
use crate::gateway::{GatewayError, QuoteGateway};
use crate::lifecycle::{GenerationKey, ResourceLifecycleManager};
use crate::quote::Quote;
use crate::view::{DocumentDisplay, FallbackActions, QuoteDisplay, WorkflowObserver};
use crate::workflow::{QuoteWorkflow, WorkflowState};

pub struct QuoteSession<G> {
    quote: Quote,
    workflow: QuoteWorkflow<G>,
    documents: ResourceLifecycleManager,
    fetcher: DocumentFetcher,
}

impl<G: QuoteGateway> QuoteSession<G> {
    /// Fetch `record_id` and open a session on it.
    pub async fn open(
        gateway: G,
        fetcher: DocumentFetcher,
        record_id: &str,
    ) -> Result<Self, GatewayError> {
        let data = gateway.fetch_quote(record_id).await?;
        let quote = Quote::from(data);
        info!(record_id, quote_code = %quote.code, "quote opened");

        // Actions go to the record id the service reported.
        let action_id = if quote.record_id.trim().is_empty() {
            record_id.to_string()
        } else {
            quote.record_id.clone()
        };
        let workflow = QuoteWorkflow::new(gateway, action_id);

        Ok(Self {
            quote,
            workflow,
            documents: ResourceLifecycleManager::new(),
            fetcher,
        })
    }

    pub fn with_observer(mut self, observer: impl WorkflowObserver + 'static) -> Self {
        self.workflow = self.workflow.with_observer(observer);
        self
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn workflow(&self) -> &QuoteWorkflow<G> {
        &self.workflow
    }

    pub fn state(&self) -> WorkflowState {
        self.workflow.state()
    }

    pub fn display(&self) -> QuoteDisplay {
        QuoteDisplay::new(&self.quote, self.workflow.state())
    }

    pub fn fallback(&self) -> FallbackActions {
        FallbackActions::for_quote(&self.quote, self.fetcher.placeholder_url())
    }

    /// Resolve the quote's document for display.
    pub async fn load_document(&mut self) -> DocumentDisplay {
        let key = GenerationKey::new(self.quote.code.clone(), self.quote.document.clone());
        self.documents.load(&self.fetcher, key).await;
        self.document()
    }

    /// Retry the document as a new generation.
    pub async fn retry_document(&mut self) -> DocumentDisplay {
        if self.documents.key().is_none() {
            return self.load_document().await;
        }
        self.documents.reload(&self.fetcher).await;
        self.document()
    }

    pub fn document(&self) -> DocumentDisplay {
        DocumentDisplay::from_slot(self.documents.slot(), self.fallback())
    }

    pub fn document_handle(&self) -> Option<&ResourceHandle> {
        self.documents.slot().handle()
    }

    /// Tear the session down: release the document and close the workflow.
    pub fn close(mut self) {
        self.workflow.close();
        self.documents.teardown();
        info!(quote_code = %self.quote.code, "quote closed");
    }
}
