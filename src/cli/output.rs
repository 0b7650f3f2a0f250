//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::WikiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &WikiError) -> String {
    match e {
        WikiError::Batch(inner) => format!("Batch aborted: {}", inner),
        other => other.to_string(),
    }
}
