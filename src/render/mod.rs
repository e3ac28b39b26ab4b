//! JSON result documents written to stdout.

pub mod report;

pub use report::{FailureReport, QueryReport, TsoReport};

/// Serialize a result document for the calling automation.
pub fn render_json<T: serde::Serialize>(doc: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}
