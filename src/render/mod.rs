//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::model::FileInfo;
use anyhow::{anyhow, Result};

/// Trait for rendering a scanned file into a specific output format.
pub trait Renderer: Send + Sync {
    fn render(&self, file: &FileInfo) -> Result<String>;
    fn file_extension(&self) -> &str;

    /// Whether the page keeps the hand-authored prefix of its previous version.
    fn merges_existing(&self) -> bool {
        false
    }
}

/// Create a renderer for the given format name.
///
/// `hide_private` only affects pages; JSON always carries the whole model.
pub fn create_renderer(format: &str, hide_private: bool) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer { hide_private })),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use markdown or json",
            format
        )),
    }
}
