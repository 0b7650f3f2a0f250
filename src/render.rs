//! Terminal rendering for wiki pages.

use owo_colors::OwoColorize;

/// Render a page for the terminal.
///
/// A line made only of one backtick-quoted snippet (tldr example commands) becomes a
/// fenced code block. With `color`, headings are bold cyan and code is green.
pub fn render(text: &str, color: bool) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            push_line(&mut out, line);
            continue;
        }

        if in_fence {
            push_line(&mut out, &style_code(line, color));
            continue;
        }

        if let Some(snippet) = inline_code_line(line) {
            out.push('\n');
            push_line(&mut out, "```");
            push_line(&mut out, &style_code(snippet, color));
            push_line(&mut out, "```");
            out.push('\n');
        } else if line.starts_with('#') && color {
            push_line(&mut out, &line.bold().cyan().to_string());
        } else {
            push_line(&mut out, line);
        }
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn style_code(line: &str, color: bool) -> String {
    if color {
        line.green().to_string()
    } else {
        line.to_string()
    }
}

/// `` `snippet` `` spanning a whole line, with at least two characters inside.
fn inline_code_line(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('`')?.strip_suffix('`')?;
    if inner.chars().count() >= 2 {
        Some(inner)
    } else {
        None
    }
}
