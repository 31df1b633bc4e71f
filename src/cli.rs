//! Command-line interface built on clap.
//!
//! [`Cli`] carries the subcommands ([`Command`]: show, accept, revise,
//! download) and the global flags (`--api-base`, `--verbose`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// quote-viewer: open a quote, inspect its document, confirm it or ask for a revision.
#[derive(Debug, Parser)]
#[command(name = "quote-viewer", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the quote service (overrides config and QUOTE_API_BASE).
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a quote and the state of its document.
    Show {
        /// Record identifier from the quote link.
        record_id: String,
    },

    /// Confirm a quote.
    Accept {
        record_id: String,
    },

    /// Ask for a revised quote.
    Revise {
        record_id: String,

        /// What should change.
        #[arg(long, short)]
        message: String,
    },

    /// Save the quote document to disk.
    Download {
        record_id: String,

        /// Output path; defaults to the suggested file name.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_show_subcommand() {
        let cli = Cli::parse_from(["quote-viewer", "show", "rec42"]);
        match cli.command {
            Command::Show { record_id } => assert_eq!(record_id, "rec42"),
            _ => panic!("expected Show command"),
        }
    }

    #[test]
    fn cli_parses_revise_with_message() {
        let cli = Cli::parse_from([
            "quote-viewer",
            "revise",
            "rec42",
            "--message",
            "Reduce item A to 5 units",
        ]);
        match cli.command {
            Command::Revise { record_id, message } => {
                assert_eq!(record_id, "rec42");
                assert_eq!(message, "Reduce item A to 5 units");
            }
            _ => panic!("expected Revise command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "quote-viewer",
            "--api-base",
            "http://localhost:5678",
            "-v",
            "download",
            "rec42",
            "--out",
            "quote.pdf",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:5678"));
        match cli.command {
            Command::Download { out, .. } => assert_eq!(out, Some(PathBuf::from("quote.pdf"))),
            _ => panic!("expected Download command"),
        }
    }

    #[test]
    fn revise_requires_message() {
        assert!(Cli::try_parse_from(["quote-viewer", "revise", "rec42"]).is_err());
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
