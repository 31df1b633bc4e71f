//! Terminal rendering for the quote views: spinner and coloured output.
//!
//! Uses `indicatif` for the spinner shown while a remote call is pending and
//! `console` for styling. This is the stand-in for the customer-facing page.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use quote_viewer::view::{DocumentDisplay, QuoteDisplay};
use quote_viewer::workflow::WorkflowState;

/// Spinner plus the styles used for the final message.
pub struct Progress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl Progress {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    pub fn success(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.green.apply_to("✓"));
    }

    pub fn failure(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.red.apply_to("✗"));
    }

    pub fn warning(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.yellow.apply_to("!"));
    }

    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

fn state_style(state: WorkflowState) -> Style {
    match state {
        WorkflowState::Pending => Style::new().cyan(),
        WorkflowState::Confirmed => Style::new().green().bold(),
        WorkflowState::RevisionRequested => Style::new().yellow().bold(),
    }
}

pub fn print_quote(display: &QuoteDisplay) {
    let title = Style::new().bold();
    let dim = Style::new().dim();
    println!();
    println!(
        "{}  [{}]",
        title.apply_to(format!("Quote #{}", display.id)),
        state_style(display.state).apply_to(display.status_label)
    );
    println!("  {} {}", dim.apply_to("Customer:"), display.customer_name);
    println!("  {} {}", dim.apply_to("Company: "), display.company_name);
    println!("  {} {}", dim.apply_to("Date:    "), display.date);
    if let Some(note) = &display.note {
        println!();
        println!("  {}", dim.apply_to("Notes:"));
        for line in note.lines() {
            println!("    {line}");
        }
    }
}

pub fn print_document(display: &DocumentDisplay) {
    let dim = Style::new().dim();
    println!();
    match display {
        DocumentDisplay::Loading { .. } => {
            println!("  {} loading…", dim.apply_to("Document:"));
        }
        DocumentDisplay::Ready {
            address,
            media_type,
            len,
            ..
        } => {
            println!(
                "  {} {} ({media_type}, {len} bytes)",
                dim.apply_to("Document:"),
                Style::new().green().apply_to(address)
            );
        }
        DocumentDisplay::Unavailable { reason, .. } => {
            println!(
                "  {} {}",
                dim.apply_to("Document:"),
                Style::new().yellow().apply_to(reason.user_message())
            );
        }
    }
    let fallback = display.fallback();
    println!("  {} {}", dim.apply_to("Open:    "), fallback.open_external);
    println!(
        "  {} {} -> {}",
        dim.apply_to("Download:"),
        fallback.download_url,
        fallback.download_file_name
    );
}

pub fn print_settled(state: WorkflowState) {
    let style = state_style(state);
    println!();
    match state {
        WorkflowState::Confirmed => println!(
            "{}",
            style.apply_to("Quote confirmed. Our team will contact you about next steps.")
        ),
        WorkflowState::RevisionRequested => println!(
            "{}",
            style.apply_to("Revision request sent. A revised quote will follow shortly.")
        ),
        WorkflowState::Pending => {}
    }
}
