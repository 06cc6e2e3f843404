//! Parser module — single-pass header scanning.

pub mod classify;
pub mod extract;
pub mod scan;
pub mod skip;

use crate::model::FileInfo;
use anyhow::{Context, Result};
use extract::Naming;
use scan::Scanner;
use std::fs;
use std::path::Path;

/// Line prefixes ignored before classification unless overridden.
const DEFAULT_IGNORE_PREFIXES: &[&str] = &[
    "//~",
    "DECLARE_DELEGATE",
    "DECLARE_MULTICAST_DELEGATE",
    "DECLARE_DYNAMIC_DELEGATE",
    "DECLARE_DYNAMIC_MULTICAST_DELEGATE",
    "DECLARE_EVENT",
];

/// Settings shared by discovery and scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Source file extensions, without the dot
    pub extensions: Vec<String>,
    /// File names never scanned
    pub ignore_files: Vec<String>,
    /// Trimmed lines starting with one of these are invisible to the scanner
    pub ignore_prefixes: Vec<String>,
    pub naming: Naming,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["h".to_string(), "hpp".to_string()],
            ignore_files: Vec::new(),
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES.iter().map(|p| p.to_string()).collect(),
            naming: Naming::default(),
        }
    }
}

impl ScanOptions {
    pub fn ignores_line(&self, line: &str) -> bool {
        self.ignore_prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }

    /// True when `path` has a scanned extension and is not ignored by name.
    pub fn accepts_file(&self, path: &Path) -> bool {
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext));
        let name_ok = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| !self.ignore_files.iter().any(|i| i == name));
        ext_ok && name_ok
    }
}

/// Scan header text into a [`FileInfo`]. Never fails.
pub fn scan_str(path: &str, name: &str, content: &str, options: &ScanOptions) -> FileInfo {
    let mut scanner = Scanner::new(options);
    for line in content.strip_prefix('\u{feff}').unwrap_or(content).lines() {
        scanner.feed(line);
    }

    let mut file = FileInfo::new(path, name);
    file.declarations = scanner.finish();
    file
}

/// Read and scan one header file.
pub fn scan_file(path: &Path, options: &ScanOptions) -> Result<FileInfo> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(scan_str(&path.to_string_lossy(), &name, &content, options))
}
