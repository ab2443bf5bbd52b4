//! Parley application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing (stderr, so the transcript on stdout stays clean)
//! 3. Build the HTTP chat service and the conversation session
//! 4. Run one message (`--once`) or the interactive loop

mod cli;
mod render;
mod repl;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use parley_chat::{ChatSession, HttpChatService, SendOptions};
use parley_core::ParleyConfig;

use crate::cli::CliArgs;

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

/// Load the config file, falling back to defaults.
///
/// The log level lives in the config, so the global subscriber does not exist
/// yet; load warnings go to a temporary stderr subscriber instead.
fn load_config(path: &Path) -> ParleyConfig {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, || ParleyConfig::load_or_default(path))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = load_config(&config_file);
    args.apply(&mut config);

    // Tracing.
    init_tracing(&config.general.log_level);
    tracing::info!("Starting Parley v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Service + session.
    let service = HttpChatService::new(&config.service)?;
    tracing::info!(
        endpoint = %service.endpoint(),
        timeout_ms = config.service.timeout_ms,
        "Chat service ready"
    );
    let session = ChatSession::new(Arc::new(service), &config);

    if let Some(ref text) = args.once {
        let outcome = session.send(Some(text), SendOptions::default()).await;
        repl::print_new_turns(&session, 0, outcome);
        return Ok(());
    }

    repl::run(&session).await?;
    Ok(())
}
