//! hdrdoc — generate reference pages from annotated C++ headers.
//!
//! Scans every header below a source directory in a single pass per file,
//! builds a File → Declaration → Property/Function model and writes one page
//! per header into the destination directory:
//!
//! - **markdown** (default): `.mdx` pages that keep the hand-written part of
//!   an existing page above its `## File Info` marker
//! - **json**: the scanned model, for tooling

mod merge;
mod model;
mod parser;
mod render;
mod toc;
mod walk;

use anyhow::{Context, Result};
use clap::Parser;
use parser::ScanOptions;
use rayon::prelude::*;
use render::Renderer;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "hdrdoc",
    about = "Generate reference pages from annotated C++ headers"
)]
struct Cli {
    /// Directory scanned recursively for headers
    source: PathBuf,

    /// Output directory, created if missing
    dest: PathBuf,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Header extensions to scan, without the dot.
    /// Can be specified multiple times.
    #[arg(long = "ext", default_values = ["h", "hpp"])]
    extensions: Vec<String>,

    /// File name to skip, e.g. `Globals.h`. Can be specified multiple times.
    #[arg(long)]
    ignore_file: Vec<String>,

    /// Ignore source lines starting with this text, in addition to the
    /// built-in delegate macros. Can be specified multiple times.
    #[arg(long)]
    ignore_prefix: Vec<String>,

    /// Leave private properties and functions out of the pages
    #[arg(long)]
    hide_private: bool,
}

impl Cli {
    fn scan_options(&self) -> ScanOptions {
        let mut options = ScanOptions {
            extensions: self.extensions.clone(),
            ignore_files: self.ignore_file.clone(),
            ..ScanOptions::default()
        };
        options.ignore_prefixes.extend(self.ignore_prefix.iter().cloned());
        options
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hdrdoc=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let renderer = render::create_renderer(&cli.format, cli.hide_private)?;
    let options = cli.scan_options();

    let discovery = walk::discover(&cli.source, &options)?;

    fs::create_dir_all(&cli.dest)
        .with_context(|| format!("failed to create output directory: {}", cli.dest.display()))?;

    info!("scanning {} headers under {}", discovery.files.len(), cli.source.display());

    let groups = group_by_output_name(&discovery.files);
    for group in groups.iter().filter(|g| g.len() > 1) {
        let list: Vec<String> = group.iter().map(|p| p.display().to_string()).collect();
        warn!(
            "output name {} is shared by {}; the last one wins",
            derive_output_name(group[0]),
            list.join(", ")
        );
    }

    // Headers sharing a page run one after another, in path order
    let renderer = renderer.as_ref();
    let options = &options;
    let results: Vec<(&PathBuf, Result<Option<PathBuf>>)> = groups
        .par_iter()
        .flat_map_iter(|group| {
            group.iter().map(move |path| {
                let outcome = process_file(path, &cli.dest, renderer, options);
                (*path, outcome)
            })
        })
        .collect();

    let mut written = 0usize;
    let mut empty = 0usize;
    let mut failed = 0usize;
    for (path, outcome) in results {
        match outcome {
            Ok(Some(out_path)) => {
                debug!("{} → {}", path.display(), out_path.display());
                written += 1;
            }
            Ok(None) => empty += 1,
            Err(e) => {
                warn!("skipping {}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }

    for error in &discovery.errors {
        warn!("could not read {}: {}", error.path().display(), error.error());
    }

    info!(
        "wrote {} pages ({} without declarations, {} failed)",
        written, empty, failed
    );
    Ok(())
}

/// Scan one header and write its page. `None` when it declares nothing.
fn process_file(
    path: &Path,
    dest: &Path,
    renderer: &dyn Renderer,
    options: &ScanOptions,
) -> Result<Option<PathBuf>> {
    let file = parser::scan_file(path, options)?;
    if file.declarations.is_empty() {
        debug!("no declarations in {}", path.display());
        return Ok(None);
    }

    let name = derive_output_name(path);
    let out_path = dest.join(format!("{}.{}", name, renderer.file_extension()));
    let body = renderer.render(&file)?;

    let output = if renderer.merges_existing() {
        let existing = read_existing_page(&out_path)?;
        if existing.is_none() {
            debug!("creating {}", out_path.display());
        }
        merge::compose(&file.name, existing.as_deref(), &body)
    } else {
        body
    };

    fs::write(&out_path, output)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok(Some(out_path))
}

/// Previous version of a page, `None` if there is none yet.
///
/// Any other read failure is an error so the page is left untouched.
fn read_existing_page(path: &Path) -> Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read existing page {}", path.display())),
    }
}

/// Derive the output file name (without extension) from a source path.
/// "Source/Public/FlowTask.h" → "FlowTask"
fn derive_output_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sorted paths grouped by the page they write, groups ordered by name.
fn group_by_output_name(files: &[PathBuf]) -> Vec<Vec<&PathBuf>> {
    let mut groups: BTreeMap<String, Vec<&PathBuf>> = BTreeMap::new();
    for path in files {
        groups.entry(derive_output_name(path)).or_default().push(path);
    }
    groups.into_values().collect()
}
