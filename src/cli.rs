//! CLI domain: parse, route, help, output, and presentation.
//! Routes hand work to the batch, page and repository modules.

mod generate;
mod help;
mod output;
mod parse;
mod presentation;
mod prompt;
mod route;

pub use generate::ToolContext;
pub use help::{command_name, tool_command_name};
pub use output::map_error;
pub use parse::{
    GlobalArgs, InitArgs, ReportFormat, ToolCli, ToolCommands, WikiCli, WikiCommands,
};
pub use presentation::{
    format_batch_report, format_batch_report_json, format_batch_report_text,
    format_init_summary, format_pull_request_hint, format_update_summary,
};
pub use prompt::{Prompter, TerminalPrompter};
pub use route::WikiContext;
