use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, info, warn};

use super::error::DocumentError;
use super::store::{ResourceHandle, ResourceStore};
use crate::lifecycle::GenerationToken;
use crate::quote::DocumentRef;

/// Sample document used when a quote has no artifact of its own.
pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://www.w3.org/WAI/ER/tests/xhtml/testfiles/resources/pdf/dummy.pdf";

/// Retrieves a remote artifact into a local [`ResourceHandle`].
///
/// The artifact is copied into the process-local store instead of being handed
/// to the viewer by its remote URL, so the viewer never triggers the remote
/// host's download behaviour and never depends on its cross-origin headers.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: Client,
    store: Arc<ResourceStore>,
    placeholder_url: String,
}

impl DocumentFetcher {
    pub fn new(store: Arc<ResourceStore>) -> Result<Self, DocumentError> {
        Self::with_timeouts(store, Duration::from_secs(10), Duration::from_secs(30))
    }

    /// The client keeps no cookie store and sends no authorization header:
    /// credentials are never presented to the artifact host.
    pub fn with_timeouts(
        store: Arc<ResourceStore>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, DocumentError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            store,
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
        })
    }

    pub fn with_placeholder(mut self, placeholder_url: impl Into<String>) -> Self {
        self.placeholder_url = placeholder_url.into();
        self
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    pub fn store(&self) -> &Arc<ResourceStore> {
        &self.store
    }

    /// Retrieve `reference` for the generation identified by `token`.
    ///
    /// The token is checked after every suspension point. When it has gone
    /// stale the partial result is dropped (and any registered handle
    /// released) and [`DocumentError::Superseded`] is returned.
    pub async fn fetch(
        &self,
        reference: &DocumentRef,
        token: &GenerationToken,
    ) -> Result<ResourceHandle, DocumentError> {
        if reference.is_placeholder(&self.placeholder_url) {
            debug!(generation = token.generation(), "no artifact configured");
            return Err(DocumentError::NoArtifact);
        }

        let url = reference.url.trim();
        debug!(generation = token.generation(), %url, "retrieving document");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, reference.kind.mime())
            .send()
            .await;
        if !token.is_current() {
            return Err(DocumentError::Superseded);
        }
        let response = response?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "document request failed");
            return Err(DocumentError::transport(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let declared = content_type
            .as_deref()
            .is_some_and(|ct| reference.kind.matches_content_type(ct));
        if !declared {
            warn!(%url, content_type = ?content_type, "document has unexpected media type");
            return Err(DocumentError::UnexpectedKind { content_type });
        }

        let body = response.bytes().await;
        if !token.is_current() {
            return Err(DocumentError::Superseded);
        }
        let body = body?;

        let handle = self.store.register(body, reference.kind.mime());
        info!(
            generation = token.generation(),
            address = %handle.address(),
            len = handle.len(),
            "document ready"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::GenerationToken;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PDF: &[u8] = b"%PDF-1.4\n%test\n";

    fn fetcher() -> DocumentFetcher {
        DocumentFetcher::new(ResourceStore::new()).unwrap()
    }

    #[tokio::test]
    async fn fetch_materializes_pdf() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.pdf"))
            .and(header("accept", "application/pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PDF, "application/pdf"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher();
        let reference = DocumentRef::pdf("doc.pdf", format!("{}/doc.pdf", server.uri()));
        let handle = fetcher
            .fetch(&reference, &GenerationToken::detached())
            .await
            .unwrap();

        assert_eq!(&handle.bytes()[..], PDF);
        assert_eq!(handle.media_type(), "application/pdf");
        assert!(fetcher.store().contains(handle.address()));
    }

    #[tokio::test]
    async fn fetch_sends_no_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PDF, "application/pdf"))
            .mount(&server)
            .await;

        let reference = DocumentRef::pdf("doc.pdf", format!("{}/doc.pdf", server.uri()));
        fetcher()
            .fetch(&reference, &GenerationToken::detached())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
        assert!(!requests[0].headers.contains_key("cookie"));
    }

    #[tokio::test]
    async fn not_found_is_transport_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = fetcher();
        let reference = DocumentRef::pdf("doc.pdf", format!("{}/doc.pdf", server.uri()));
        let err = fetcher
            .fetch(&reference, &GenerationToken::detached())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(fetcher.store().created(), 0);
    }

    #[tokio::test]
    async fn wrong_media_type_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PDF, "application/octet-stream"))
            .mount(&server)
            .await;

        let fetcher = fetcher();
        let reference = DocumentRef::pdf("doc.pdf", format!("{}/doc.pdf", server.uri()));
        let err = fetcher
            .fetch(&reference, &GenerationToken::detached())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DocumentError::UnexpectedKind {
                content_type: Some("application/octet-stream".into())
            }
        );
        assert_eq!(fetcher.store().live(), 0);
    }

    #[tokio::test]
    async fn placeholder_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let placeholder = format!("{}/dummy.pdf", server.uri());
        let fetcher = fetcher().with_placeholder(placeholder.clone());
        for url in [placeholder.as_str(), "", "   "] {
            let err = fetcher
                .fetch(&DocumentRef::pdf("", url), &GenerationToken::detached())
                .await
                .unwrap_err();
            assert_eq!(err, DocumentError::NoArtifact);
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_without_status() {
        let fetcher = DocumentFetcher::with_timeouts(
            ResourceStore::new(),
            Duration::from_millis(200),
            Duration::from_millis(500),
        )
        .unwrap();
        let err = fetcher
            .fetch(
                &DocumentRef::pdf("doc.pdf", "http://127.0.0.1:9/doc.pdf"),
                &GenerationToken::detached(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Transport { status: None, .. }));
    }
}
