//! The quote record as the view sees it.
//!
//! A [`Quote`] is built once from a successful fetch and never changes; the
//! only mutable part of an open quote is its workflow state, which lives in
//! [`QuoteWorkflow`](crate::workflow::QuoteWorkflow).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::gateway::QuoteData;

/// Binary formats a quote artifact can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Pdf,
}

impl MediaKind {
    pub fn mime(&self) -> &'static str {
        match self {
            MediaKind::Pdf => "application/pdf",
        }
    }

    /// Whether a `Content-Type` header value declares this kind.
    /// Parameters such as `; charset=...` are ignored; no sniffing is done.
    pub fn matches_content_type(&self, content_type: &str) -> bool {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        essence.eq_ignore_ascii_case(self.mime())
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mime())
    }
}

/// Reference to the remote artifact attached to a quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_name: String,
    pub url: String,
    pub kind: MediaKind,
}

impl DocumentRef {
    pub fn pdf(file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            url: url.into(),
            kind: MediaKind::Pdf,
        }
    }

    /// True when no real artifact is configured.
    pub fn is_placeholder(&self, placeholder_url: &str) -> bool {
        let url = self.url.trim();
        url.is_empty() || url == placeholder_url
    }
}

/// An immutable quote record, field for field what the service returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub code: String,
    pub quote_date: String,
    pub valid_until: String,
    pub customer_name: String,
    pub contact_name: String,
    pub personal_email: String,
    pub company_email: String,
    pub description: String,
    pub note: Option<String>,
    pub document: DocumentRef,
    pub record_id: String,
    pub remote_status: Option<String>,
}

impl From<QuoteData> for Quote {
    fn from(data: QuoteData) -> Self {
        Self {
            code: data.quote_code,
            quote_date: data.quote_date,
            valid_until: data.valid_until,
            customer_name: data.customer_name,
            contact_name: data.contact_name,
            personal_email: data.personal_email,
            company_email: data.company_email,
            description: data.description,
            note: data.sale_note,
            document: DocumentRef::pdf(data.quote_file.file_name, data.quote_file.file_url),
            record_id: data.record_id,
            remote_status: data.status,
        }
    }
}

impl Quote {
    /// The person to address: the contact when known, otherwise the customer.
    pub fn display_customer_name(&self) -> &str {
        if self.contact_name.trim().is_empty() {
            &self.customer_name
        } else {
            &self.contact_name
        }
    }

    pub fn display_company_name(&self) -> &str {
        &self.customer_name
    }

    pub fn display_date(&self) -> String {
        format_display_date(&self.quote_date)
    }

    /// Suggested file name when the customer downloads the original artifact.
    pub fn download_file_name(&self) -> String {
        format!("quote-{}.pdf", self.code)
    }
}

/// Formats an ISO date or timestamp as `DD/MM/YYYY`.
///
/// Input that is not a recognised date is returned unchanged.
pub fn format_display_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::QuoteFileInfo;

    fn data() -> QuoteData {
        QuoteData {
            quote_code: "QT-2025-001".into(),
            quote_date: "2025-03-04T10:15:00+07:00".into(),
            valid_until: "2025-04-04".into(),
            customer_name: "Acme Trading".into(),
            contact_name: "Tran Thi B".into(),
            personal_email: "b@example.com".into(),
            company_email: "sales@acme.example".into(),
            description: "Warehouse shelving".into(),
            sale_note: Some("See https://acme.example/terms".into()),
            quote_file: QuoteFileInfo {
                file_name: "QT-2025-001.pdf".into(),
                file_url: "https://host/doc.pdf".into(),
            },
            record_id: "rec1".into(),
            status: Some("sent".into()),
        }
    }

    #[test]
    fn document_refs_key_a_set() {
        let mut seen = std::collections::HashSet::new();
        assert!(seen.insert(DocumentRef::pdf("a.pdf", "https://host/a.pdf")));
        assert!(seen.insert(DocumentRef::pdf("a.pdf", "https://host/b.pdf")));
        assert!(!seen.insert(DocumentRef::pdf("a.pdf", "https://host/a.pdf")));
        assert!(!seen.contains(&Quote::from(data()).document));
    }

    #[test]
    fn maps_every_field() {
        let q = Quote::from(data());
        assert_eq!(q.code, "QT-2025-001");
        assert_eq!(q.quote_date, "2025-03-04T10:15:00+07:00");
        assert_eq!(q.valid_until, "2025-04-04");
        assert_eq!(q.customer_name, "Acme Trading");
        assert_eq!(q.contact_name, "Tran Thi B");
        assert_eq!(q.personal_email, "b@example.com");
        assert_eq!(q.company_email, "sales@acme.example");
        assert_eq!(q.description, "Warehouse shelving");
        assert_eq!(q.note.as_deref(), Some("See https://acme.example/terms"));
        assert_eq!(q.document, DocumentRef::pdf("QT-2025-001.pdf", "https://host/doc.pdf"));
        assert_eq!(q.record_id, "rec1");
        assert_eq!(q.remote_status.as_deref(), Some("sent"));
    }

    #[test]
    fn customer_name_falls_back_to_company() {
        let mut d = data();
        d.contact_name = "  ".into();
        let q = Quote::from(d);
        assert_eq!(q.display_customer_name(), "Acme Trading");
        assert_eq!(q.display_company_name(), "Acme Trading");
    }

    #[test]
    fn display_date_uses_own_offset() {
        let q = Quote::from(data());
        assert_eq!(q.display_date(), "04/03/2025");
    }

    #[test]
    fn format_date_variants() {
        assert_eq!(format_display_date("2025-12-31"), "31/12/2025");
        assert_eq!(format_display_date("2025-01-09T23:59:59"), "09/01/2025");
        assert_eq!(format_display_date("2025-01-09T23:59:59.250Z"), "09/01/2025");
        assert_eq!(format_display_date("next tuesday"), "next tuesday");
    }

    #[test]
    fn media_kind_is_strict() {
        let pdf = MediaKind::Pdf;
        assert!(pdf.matches_content_type("application/pdf"));
        assert!(pdf.matches_content_type("Application/PDF; qs=0.9"));
        assert!(!pdf.matches_content_type("application/octet-stream"));
        assert!(!pdf.matches_content_type("text/html"));
        assert!(!pdf.matches_content_type(""));
    }

    #[test]
    fn placeholder_detection() {
        let placeholder = "https://example.com/dummy.pdf";
        assert!(DocumentRef::pdf("", "").is_placeholder(placeholder));
        assert!(DocumentRef::pdf("x", placeholder).is_placeholder(placeholder));
        assert!(!DocumentRef::pdf("x", "https://host/doc.pdf").is_placeholder(placeholder));
    }
}
