//! Recursive discovery of header files under a source directory.

use crate::parser::ScanOptions;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Files to scan plus the entries that could not be read during traversal.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub errors: Vec<glob::GlobError>,
}

/// Find every accepted file below `source`, sorted.
pub fn discover(source: &Path, options: &ScanOptions) -> Result<Discovery> {
    if !source.is_dir() {
        bail!("source directory not found: {}", source.display());
    }

    let root = glob::Pattern::escape(&source.to_string_lossy());
    let mut discovery = Discovery::default();

    for ext in &options.extensions {
        let pattern = format!("{}/**/*.{}", root, glob::Pattern::escape(ext));
        let entries = glob::glob(&pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;
        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_file() && options.accepts_file(&path) {
                        discovery.files.push(path);
                    }
                }
                Err(e) => discovery.errors.push(e),
            }
        }
    }

    // Sort for deterministic output
    discovery.files.sort();
    discovery.files.dedup();
    Ok(discovery)
}
