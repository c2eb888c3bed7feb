//! Expand an input path into the list of source files to process.

use crate::config::Discovery;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("input path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A file path yields itself; a directory yields every file with one of the
/// configured extensions, sorted. Hidden directories are skipped.
pub fn discover_files(path: &Path, discovery: &Discovery) -> Result<Vec<PathBuf>, DiscoverError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(DiscoverError::NotFound(path.to_path_buf()));
    }

    let mut walker = WalkDir::new(path);
    if !discovery.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), &discovery.extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(root = %path.display(), count = files.len(), "discovered files");
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.trim_start_matches('.') == ext))
}
