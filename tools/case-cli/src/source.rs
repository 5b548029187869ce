//! Declarations read from annotated source files

use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use anyhow::{
    Context,
    Result,
};
use case_oracle::{
    Declaration,
    scan_source,
};
use tracing::{
    debug,
    info,
};
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "java";

/// Annotated source files under `path`, sorted so scans are reproducible.
pub fn collect_source_files(path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0 || (!name.starts_with('.') && name != "target")
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == SOURCE_EXTENSION)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Scan every source file under `path`, in path order.
pub fn scan_path(path: &Path) -> Result<Vec<Declaration>> {
    let files = collect_source_files(path);
    info!(files = files.len(), path = %path.display(), "scanning sources");
    let mut declarations = Vec::new();
    for file in &files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let found = scan_source(&text).with_context(|| format!("in {}", file.display()))?;
        debug!(file = %file.display(), routines = found.len(), "scanned");
        declarations.extend(found);
    }
    Ok(declarations)
}
