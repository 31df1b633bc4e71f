pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_API_BASE, QuoteServiceClient};
pub use error::GatewayError;
pub use types::{ActionResponse, QuoteData, QuoteFileInfo};

/// The three remote operations behind a quote.
///
/// Each call is one asynchronous round trip with no internal retry. Callers
/// may drop the returned future at any time; abandoning a call has no effect
/// on the remote system beyond what was already sent.
#[allow(async_fn_in_trait)]
pub trait QuoteGateway {
    /// Fetch the quote record for `record_id`.
    async fn fetch_quote(&self, record_id: &str) -> Result<QuoteData, GatewayError>;

    /// Confirm the quote.
    async fn accept_quote(&self, record_id: &str) -> Result<ActionResponse, GatewayError>;

    /// Ask for a revised quote. `message` is trimmed and must not be empty.
    async fn request_revision(
        &self,
        record_id: &str,
        message: &str,
    ) -> Result<ActionResponse, GatewayError>;
}

impl<G: QuoteGateway> QuoteGateway for &G {
    async fn fetch_quote(&self, record_id: &str) -> Result<QuoteData, GatewayError> {
        (**self).fetch_quote(record_id).await
    }

    async fn accept_quote(&self, record_id: &str) -> Result<ActionResponse, GatewayError> {
        (**self).accept_quote(record_id).await
    }

    async fn request_revision(
        &self,
        record_id: &str,
        message: &str,
    ) -> Result<ActionResponse, GatewayError> {
        (**self).request_revision(record_id, message).await
    }
}
