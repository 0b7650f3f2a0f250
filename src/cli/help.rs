//! CLI command-name contract for logging.

use crate::cli::parse::{ToolCommands, WikiCli, WikiCommands};

/// Command name string for log records (e.g. "query", "init", "tool.init").
pub fn command_name(cli: &WikiCli) -> &'static str {
    match &cli.command {
        Some(WikiCommands::Init { .. }) => "init",
        Some(WikiCommands::Update) => "update",
        None => "query",
    }
}

pub fn tool_command_name(command: &ToolCommands) -> &'static str {
    match command {
        ToolCommands::Init { .. } => "tool.init",
    }
}
