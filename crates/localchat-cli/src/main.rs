//! CLI entry point.
//!
//! Loads `.env`, parses flags into [`Settings`](localchat_core::Settings),
//! installs logging and runs the HTTP server until Ctrl-C.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use localchat_cli::{Cli, CliError, init_tracing};
use localchat_core::validate_settings;

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = cli.into_settings();
    validate_settings(&settings)?;

    info!(
        addr = %settings.addr(),
        candidates = settings.candidates.len(),
        inference = localchat_runtime::inference_compiled_in(),
        "Starting localchat"
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Ctrl-C received, shutting down"),
                Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
            }
            cancel.cancel();
        }
    });

    localchat_axum::start_server(settings, cancel)
        .await
        .map_err(CliError::Server)
}

#[tokio::main]
async fn main() {
    // Load environment variables before parsing so `LOCALCHAT_*` in .env apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{e}");
        std::process::exit(e.exit_code());
    }
}
