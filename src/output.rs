//! Output naming policy and atomic writes.

use crate::config::{Output, OutputMode};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the result for `source` goes under the given output settings.
pub fn destination(source: &Path, output: &Output) -> PathBuf {
    let basename = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match output.mode {
        OutputMode::Patch => {
            let dir = output
                .directory
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            dir.join(format!("{basename}.patch"))
        }
        OutputMode::Prefix => source.with_file_name(format!("{}{basename}", output.prefix)),
        OutputMode::InPlace => source.to_path_buf(),
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the destination is left untouched.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
