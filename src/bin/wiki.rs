//! Wiki CLI Binary
//!
//! Looks up command pages, generating and sharing missing ones.

use clap::Parser;
use gptwiki::cli::{GlobalArgs, WikiCli, WikiContext};
use gptwiki::config::ConfigLoader;
use gptwiki::logging::{init_logging, LoggingConfig};
use std::io::{self, IsTerminal};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = WikiCli::parse();

    let logging_config = build_logging_config(&cli.global);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Wiki CLI starting");

    let context = match WikiContext::new(cli.global.config.clone()) {
        Ok(ctx) => ctx.with_color(io::stdout().is_terminal()),
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", gptwiki::cli::map_error(&e));
            process::exit(1);
        }
    };

    let mut stdout = io::stdout();
    if let Err(e) = context.execute(&cli, &mut stdout).await {
        error!("Command failed: {}", e);
        eprintln!("{}", gptwiki::cli::map_error(&e));
        process::exit(1);
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
