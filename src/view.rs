//! Contracts handed to the presentation layer.
//!
//! Nothing here renders; these are the values a view needs to draw the quote
//! header, the document panel with its fallback actions, and to react to the
//! workflow settling.

use serde::Serialize;

use crate::document::{DocumentError, ResourceAddress};
use crate::lifecycle::DocumentSlot;
use crate::quote::Quote;
use crate::workflow::WorkflowState;

/// Header data for one quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteDisplay {
    pub id: String,
    pub customer_name: String,
    pub company_name: String,
    pub date: String,
    pub state: WorkflowState,
    pub status_label: &'static str,
    pub note: Option<String>,
}

impl QuoteDisplay {
    pub fn new(quote: &Quote, state: WorkflowState) -> Self {
        Self {
            id: quote.code.clone(),
            customer_name: quote.display_customer_name().to_string(),
            company_name: quote.display_company_name().to_string(),
            date: quote.display_date(),
            state,
            status_label: state.label(),
            note: quote.note.clone(),
        }
    }
}

/// Manual ways to reach the original artifact. Always offered, whatever
/// happened to the inline copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackActions {
    /// Open the original reference in an external viewer.
    pub open_external: String,
    /// Download the original reference directly.
    pub download_url: String,
    pub download_file_name: String,
}

impl FallbackActions {
    /// `placeholder_url` stands in when the quote has no artifact of its own.
    pub fn for_quote(quote: &Quote, placeholder_url: &str) -> Self {
        let url = if quote.document.is_placeholder(placeholder_url) {
            placeholder_url.to_string()
        } else {
            quote.document.url.trim().to_string()
        };
        Self {
            open_external: url.clone(),
            download_url: url,
            download_file_name: quote.download_file_name(),
        }
    }
}

/// What the document panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentDisplay {
    Loading {
        fallback: FallbackActions,
    },
    /// The artifact is available at a local address.
    Ready {
        address: ResourceAddress,
        media_type: String,
        len: usize,
        fallback: FallbackActions,
    },
    /// Inline display is not possible; `reason` explains why.
    Unavailable {
        reason: DocumentError,
        fallback: FallbackActions,
    },
}

impl DocumentDisplay {
    pub fn from_slot(slot: &DocumentSlot, fallback: FallbackActions) -> Self {
        match slot {
            DocumentSlot::Idle | DocumentSlot::Loading => DocumentDisplay::Loading { fallback },
            DocumentSlot::Ready(handle) => DocumentDisplay::Ready {
                address: handle.address().clone(),
                media_type: handle.media_type().to_string(),
                len: handle.len(),
                fallback,
            },
            DocumentSlot::Failed(reason) => DocumentDisplay::Unavailable {
                reason: reason.clone(),
                fallback,
            },
        }
    }

    pub fn fallback(&self) -> &FallbackActions {
        match self {
            DocumentDisplay::Loading { fallback }
            | DocumentDisplay::Ready { fallback, .. }
            | DocumentDisplay::Unavailable { fallback, .. } => fallback,
        }
    }
}

/// Callbacks fired once the workflow settles.
pub trait WorkflowObserver {
    fn on_confirmed(&self) {}

    fn on_revision_requested(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ResourceStore;
    use crate::gateway::{QuoteData, QuoteFileInfo};
    use bytes::Bytes;

    const PLACEHOLDER: &str = "https://example.com/dummy.pdf";

    fn quote(url: &str) -> Quote {
        Quote::from(QuoteData {
            quote_code: "QT-9".into(),
            quote_date: "2025-02-01".into(),
            valid_until: "2025-03-01".into(),
            customer_name: "Acme".into(),
            contact_name: "Le Van C".into(),
            personal_email: String::new(),
            company_email: String::new(),
            description: String::new(),
            sale_note: None,
            quote_file: QuoteFileInfo {
                file_name: "q.pdf".into(),
                file_url: url.into(),
            },
            record_id: "rec9".into(),
            status: None,
        })
    }

    #[test]
    fn quote_display_contract() {
        let display = QuoteDisplay::new(&quote("https://host/doc.pdf"), WorkflowState::Pending);
        assert_eq!(display.id, "QT-9");
        assert_eq!(display.customer_name, "Le Van C");
        assert_eq!(display.company_name, "Acme");
        assert_eq!(display.date, "01/02/2025");
        assert_eq!(display.status_label, "Awaiting confirmation");
    }

    #[test]
    fn fallback_uses_original_url() {
        let fb = FallbackActions::for_quote(&quote("https://host/doc.pdf"), PLACEHOLDER);
        assert_eq!(fb.open_external, "https://host/doc.pdf");
        assert_eq!(fb.download_url, "https://host/doc.pdf");
        assert_eq!(fb.download_file_name, "quote-QT-9.pdf");
    }

    #[test]
    fn fallback_uses_placeholder_without_artifact() {
        let fb = FallbackActions::for_quote(&quote(""), PLACEHOLDER);
        assert_eq!(fb.open_external, PLACEHOLDER);
    }

    #[test]
    fn failed_slot_still_offers_fallback() {
        let q = quote("https://host/doc.pdf");
        let fb = FallbackActions::for_quote(&q, PLACEHOLDER);
        let slot = DocumentSlot::Failed(DocumentError::transport(404));
        let display = DocumentDisplay::from_slot(&slot, fb.clone());

        assert_eq!(
            display,
            DocumentDisplay::Unavailable {
                reason: DocumentError::transport(404),
                fallback: fb.clone(),
            }
        );
        assert_eq!(display.fallback(), &fb);
    }

    #[test]
    fn ready_slot_exposes_local_address() {
        let store = ResourceStore::new();
        let handle = store.register(Bytes::from_static(b"%PDF"), "application/pdf");
        let address = handle.address().clone();
        let slot = DocumentSlot::Ready(handle);
        let fb = FallbackActions::for_quote(&quote("https://host/doc.pdf"), PLACEHOLDER);

        match DocumentDisplay::from_slot(&slot, fb) {
            DocumentDisplay::Ready { address: a, len, .. } => {
                assert_eq!(a, address);
                assert_eq!(len, 4);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }
}
