#![forbid(unsafe_code)]

mod config;
mod terminal;
mod viewer;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use skiff_core::app::{RetrieveOutcome, RetrieverBuilder};
use skiff_core::domain::RetrieveError;
use skiff_core::impls::TokioProcessRunner;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Cli;
use crate::terminal::{ConsoleNotifier, TerminalPicker};
use crate::viewer::CommandViewer;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "skiff_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "skiff_cli::config";
pub const TRACING_TARGET_TERMINAL: &str = "skiff_cli::terminal";
pub const TRACING_TARGET_VIEWER: &str = "skiff_cli::viewer";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    // 取得フローのエラーは notifier が表示済み
    if error.downcast_ref::<RetrieveError>().is_none() {
        eprintln!("Error: {error:#}");
    }
    tracing::debug!(target: TRACING_TARGET_STARTUP, error = %error, "terminated with error");
    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(error) = init_tracing() {
        eprintln!("Warning: {error:#}");
    }
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        "starting skiff"
    );

    let config = cli.retrieve_config()?;

    let retriever = RetrieverBuilder::new()
        .runner(Arc::new(TokioProcessRunner::new()))
        .picker(Arc::new(TerminalPicker::stdio()))
        .viewer(Arc::new(CommandViewer::new(cli.viewer.as_deref())))
        .notifier(Arc::new(ConsoleNotifier))
        .program(cli.program.as_str())
        .scheme(cli.scheme())
        .build()
        .context("failed to wire retriever")?;
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        program = %retriever.dialect().program,
        scheme = %retriever.dialect().scheme,
        "retriever ready"
    );

    if cli.startup {
        // 起動フックとしての実行。失敗しても終了コードは 0。
        retriever.run_on_startup(&config).await;
        return Ok(());
    }

    match retriever.retrieve(cli.locator.as_deref(), &config).await? {
        RetrieveOutcome::Opened { path, .. } => {
            tracing::debug!(target: TRACING_TARGET_STARTUP, path = %path.display(), "done");
        }
        RetrieveOutcome::Cancelled => {
            tracing::debug!(target: TRACING_TARGET_STARTUP, "cancelled");
        }
    }
    Ok(())
}

/// `RUST_LOG` で制御。既定は warn（対話用途なので静かに）。
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("failed to create env filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}
