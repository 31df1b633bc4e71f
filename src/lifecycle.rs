//! Binds a document's local resource to one generation of inputs.
//!
//! A generation is one attempt to resolve the document for a
//! `(quote code, document reference)` pair. Starting a new generation
//! invalidates the previous one's in-flight retrieval and releases the handle
//! it produced; tearing the manager down releases whatever is still held.
//!
//! Retrievals learn whether they are still wanted through the
//! [`GenerationToken`] passed into them, never through shared "latest" state
//! read from elsewhere.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::document::{DocumentError, DocumentFetcher, ResourceHandle};
use crate::quote::DocumentRef;

/// The inputs a generation resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerationKey {
    pub quote_code: String,
    pub document: DocumentRef,
}

impl GenerationKey {
    pub fn new(quote_code: impl Into<String>, document: DocumentRef) -> Self {
        Self {
            quote_code: quote_code.into(),
            document,
        }
    }
}

/// Captured at the start of a retrieval and checked after every suspension
/// point. Stays current until its manager starts another generation or is
/// torn down.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl GenerationToken {
    /// A token with no manager behind it; it never goes stale.
    pub fn detached() -> Self {
        Self {
            generation: 0,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// What the current generation has produced so far.
#[derive(Debug, Default)]
pub enum DocumentSlot {
    /// No generation started, or torn down.
    #[default]
    Idle,
    Loading,
    Ready(ResourceHandle),
    Failed(DocumentError),
}

impl DocumentSlot {
    pub fn handle(&self) -> Option<&ResourceHandle> {
        match self {
            DocumentSlot::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DocumentError> {
        match self {
            DocumentSlot::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn is_settled(&self) -> bool {
        matches!(self, DocumentSlot::Ready(_) | DocumentSlot::Failed(_))
    }
}

/// Owns at most one live [`ResourceHandle`] at a time and releases it when
/// superseded or torn down. Dropping the manager tears it down.
#[derive(Debug, Default)]
pub struct ResourceLifecycleManager {
    latest: Arc<AtomicU64>,
    key: Option<GenerationKey>,
    slot: DocumentSlot,
}

impl ResourceLifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self) -> &DocumentSlot {
        &self.slot
    }

    pub fn key(&self) -> Option<&GenerationKey> {
        self.key.as_ref()
    }

    pub fn current_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Start a new generation for `key`.
    ///
    /// Order matters: the previous generation is invalidated first, then its
    /// handle is released, then the new token is issued.
    pub fn begin(&mut self, key: GenerationKey) -> GenerationToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.replace_slot(DocumentSlot::Loading);
        debug!(generation, url = %key.document.url, "document generation started");
        self.key = Some(key);
        GenerationToken {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Apply a retrieval outcome for `token`'s generation.
    ///
    /// Returns `false` when the outcome was discarded because its generation
    /// is no longer current; a discarded handle is released on the spot.
    pub fn commit(
        &mut self,
        token: &GenerationToken,
        outcome: Result<ResourceHandle, DocumentError>,
    ) -> bool {
        if !token.is_current() || !Arc::ptr_eq(&token.latest, &self.latest) {
            debug!(generation = token.generation(), "discarding stale document result");
            if let Ok(handle) = outcome {
                handle.release();
            }
            return false;
        }

        match outcome {
            Ok(handle) => self.replace_slot(DocumentSlot::Ready(handle)),
            // Only produced for stale tokens, which were filtered above.
            Err(DocumentError::Superseded) => return false,
            Err(err) => self.replace_slot(DocumentSlot::Failed(err)),
        }
        true
    }

    /// Resolve `key`, reusing the settled result when the inputs are unchanged.
    pub async fn load(&mut self, fetcher: &DocumentFetcher, key: GenerationKey) -> &DocumentSlot {
        if self.key.as_ref() == Some(&key) && self.slot.is_settled() {
            return &self.slot;
        }
        self.run(fetcher, key).await
    }

    /// Re-run the current inputs as a new generation (user-initiated retry).
    pub async fn reload(&mut self, fetcher: &DocumentFetcher) -> &DocumentSlot {
        match self.key.clone() {
            Some(key) => self.run(fetcher, key).await,
            None => &self.slot,
        }
    }

    async fn run(&mut self, fetcher: &DocumentFetcher, key: GenerationKey) -> &DocumentSlot {
        let token = self.begin(key.clone());
        let outcome = fetcher.fetch(&key.document, &token).await;
        self.commit(&token, outcome);
        &self.slot
    }

    /// Invalidate any in-flight retrieval and release the held handle.
    pub fn teardown(&mut self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
        self.replace_slot(DocumentSlot::Idle);
        self.key = None;
    }

    fn replace_slot(&mut self, next: DocumentSlot) {
        let previous = std::mem::replace(&mut self.slot, next);
        if let DocumentSlot::Ready(handle) = previous {
            handle.release();
        }
    }
}

impl Drop for ResourceLifecycleManager {
    fn drop(&mut self) {
        self.teardown();
    }
}
