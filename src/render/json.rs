//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the FileInfo model directly.

use crate::model::FileInfo;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, file: &FileInfo) -> Result<String> {
        let mut out = serde_json::to_string_pretty(file)
            .with_context(|| format!("failed to serialize {}", file.name))?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
