//! CLI presentation: text and json formatters for command results.

use crate::batch::BatchReport;
use crate::cli::parse::ReportFormat;
use crate::config::WikiConfig;
use crate::error::WikiError;
use crate::git::PullOutcome;
use serde_json::json;
use std::path::Path;

pub fn format_batch_report_text(report: &BatchReport) -> String {
    let mut s = format!(
        "Batch finished: {} items, {} written, {} skipped, {} failed",
        report.total,
        report.written,
        report.skipped,
        report.failed.len()
    );
    if !report.is_complete() {
        s.push_str(&format!(
            "\nCancelled after {} of {} items",
            report.processed, report.total
        ));
    }
    if !report.failed.is_empty() {
        s.push_str("\n\nFailed paths:");
        for path in &report.failed {
            s.push_str(&format!("\n  - {}", path.display()));
        }
    }
    s
}

pub fn format_batch_report_json(report: &BatchReport) -> Result<String, WikiError> {
    let failed: Vec<String> = report
        .failed
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let out = json!({
        "total": report.total,
        "processed": report.processed,
        "written": report.written,
        "skipped": report.skipped,
        "failed": failed,
        "per_worker": report.per_worker,
    });
    serde_json::to_string_pretty(&out)
        .map_err(|e| WikiError::Config(format!("Failed to encode report: {}", e)))
}

pub fn format_batch_report(report: &BatchReport, format: ReportFormat) -> Result<String, WikiError> {
    match format {
        ReportFormat::Json => format_batch_report_json(report),
        ReportFormat::Text => Ok(format_batch_report_text(report)),
    }
}

pub fn format_init_summary(
    config: &WikiConfig,
    config_path: &Path,
    wiki_path: &Path,
    cloned: bool,
) -> String {
    let mut s = format!("Saved configuration to {}\n", config_path.display());
    s.push_str(&format!("  folder: {}\n", config.folder));
    s.push_str(&format!("  pages: {}\n", config.pages_dir()));
    s.push_str(&format!("  prompt: {}\n", config.effective_prompt()));
    if let Some(ref user_name) = config.user_name {
        s.push_str(&format!("  user: {}\n", user_name));
    }
    if cloned {
        s.push_str(&format!("Cloned page repository into {}", wiki_path.display()));
    } else {
        s.push_str(&format!("Page repository present at {}", wiki_path.display()));
    }
    s
}

pub fn format_update_summary(outcome: PullOutcome, last_commit: &str) -> String {
    let status = match outcome {
        PullOutcome::Updated => "Pages updated",
        PullOutcome::UpToDate => "Pages already up to date",
    };
    format!("{}\n\n{}", status, last_commit)
}

/// Shown when `wiki` runs without a command.
pub fn format_usage_hint() -> String {
    "Usage: wiki <command>, for example `wiki tar`\nRun `wiki init` first to fetch the pages, `wiki --help` for more".to_string()
}

/// Where the user opens a pull request for their pushed branch.
pub fn format_pull_request_hint(pull_request_base: &str, branch: &str) -> String {
    format!(
        "Page pushed. Open a pull request at {}/{}",
        pull_request_base.trim_end_matches('/'),
        branch
    )
}
