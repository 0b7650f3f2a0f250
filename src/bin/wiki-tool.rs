//! Wiki Tool Binary
//!
//! Bulk generates wiki pages from the tldr corpus.

use clap::Parser;
use gptwiki::cli::{GlobalArgs, ToolCli, ToolContext};
use gptwiki::config::ConfigLoader;
use gptwiki::logging::{init_logging, LoggingConfig};
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = ToolCli::parse();

    let logging_config = build_logging_config(&cli.global);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Wiki tool starting");

    let context = match ToolContext::new(cli.global.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", gptwiki::cli::map_error(&e));
            process::exit(1);
        }
    };

    // Ctrl-C stops workers from claiming new items; in-flight items finish.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight items");
            signal_token.cancel();
        }
    });

    match context.execute(&cli.command, cancel).await {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", gptwiki::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Logging config from the config file, overridden by CLI flags.
fn build_logging_config(global: &GlobalArgs) -> LoggingConfig {
    let mut config = ConfigLoader::resolve_path(global.config.as_deref())
        .and_then(|path| ConfigLoader::load_from(&path))
        .map(|c| c.logging)
        .unwrap_or_default();
    global.apply_logging(&mut config);
    config
}
