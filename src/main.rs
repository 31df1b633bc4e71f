mod cli;
mod ui;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use quote_viewer::config::{LogFormat, QuoteViewerConfig};
use quote_viewer::document::{DocumentFetcher, ResourceStore};
use quote_viewer::gateway::QuoteServiceClient;
use quote_viewer::session::QuoteSession;
use quote_viewer::ViewerError;
use quote_viewer::view::DocumentDisplay;
use ui::Progress;

fn init_logging(config: &QuoteViewerConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

// The view model is single-threaded: one executor thread drives every task.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = QuoteViewerConfig::load()?;
    if let Some(base) = cli.api_base.clone() {
        config.api_base = base;
    }
    init_logging(&config, cli.verbose);

    let gateway = QuoteServiceClient::with_timeouts(
        config.api_base.clone(),
        config.connect_timeout(),
        config.request_timeout(),
    )?;
    let fetcher = DocumentFetcher::with_timeouts(
        ResourceStore::new(),
        config.connect_timeout(),
        config.request_timeout(),
    )?
    .with_placeholder(config.placeholder_document_url.clone());

    let record_id = match &cli.command {
        Command::Show { record_id }
        | Command::Accept { record_id }
        | Command::Revise { record_id, .. }
        | Command::Download { record_id, .. } => record_id.clone(),
    };

    let progress = Progress::start("Loading quote…");
    let mut session = match QuoteSession::open(&gateway, fetcher, &record_id).await {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(error = %err, "failed to open quote");
            progress.failure(&err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };
    progress.clear();
    ui::print_quote(&session.display());

    let code = match cli.command {
        Command::Show { .. } => {
            let progress = Progress::start("Loading document…");
            let document = session.load_document().await;
            progress.clear();
            ui::print_document(&document);
            ExitCode::SUCCESS
        }
        Command::Accept { .. } => {
            let progress = Progress::start("Confirming quote…");
            match session.workflow().confirm().await {
                Ok(state) => {
                    progress.success("Quote confirmed");
                    ui::print_settled(state);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    progress.failure(&err.user_message());
                    ExitCode::FAILURE
                }
            }
        }
        Command::Revise { message, .. } => {
            session.workflow().set_draft(message);
            let progress = Progress::start("Sending revision request…");
            match session.workflow().submit_revision().await {
                Ok(state) => {
                    progress.success("Revision request sent");
                    ui::print_settled(state);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    progress.failure(&err.user_message());
                    ExitCode::FAILURE
                }
            }
        }
        Command::Download { out, .. } => {
            let progress = Progress::start("Downloading document…");
            let document = session.load_document().await;
            match (&document, session.document_handle()) {
                (DocumentDisplay::Ready { .. }, Some(handle)) => {
                    let path = out
                        .unwrap_or_else(|| document.fallback().download_file_name.clone().into());
                    let written = tokio::fs::write(&path, handle.bytes())
                        .await
                        .map_err(ViewerError::from);
                    match written {
                        Ok(()) => {
                            progress.success(&format!(
                                "Saved {} bytes to {}",
                                handle.len(),
                                path.display()
                            ));
                            ExitCode::SUCCESS
                        }
                        Err(err) => {
                            tracing::error!(
                                path = %path.display(),
                                error = %err,
                                "failed to save document"
                            );
                            progress.failure(&err.user_message());
                            ExitCode::FAILURE
                        }
                    }
                }
                _ => {
                    progress.warning("Document not available for download here");
                    ui::print_document(&document);
                    ExitCode::FAILURE
                }
            }
        }
    };

    session.close();
    Ok(code)
}
