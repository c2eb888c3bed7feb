//! Batch driver: process many files, isolating failures per file.

use crate::config::{Config, OutputMode};
use crate::formatter::Formatter;
use crate::output::destination;
use crate::rewrite::FileDiff;
use crate::session::{Session, SessionError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What happened to one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Docstrings already match the configured style.
    Unchanged,
    /// A patch was written (or would be, in a dry run).
    Patched { patch: PathBuf, diff: FileDiff },
    /// The rewritten file was written (or would be, in a dry run).
    Rewritten { dest: PathBuf, diff: FileDiff },
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<FileOutcome, SessionError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn changed(&self) -> usize {
        self.files
            .iter()
            .filter(|r| {
                matches!(
                    r.result,
                    Ok(FileOutcome::Patched { .. } | FileOutcome::Rewritten { .. })
                )
            })
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.files
            .iter()
            .filter(|r| matches!(r.result, Ok(FileOutcome::Unchanged)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|r| r.result.is_err()).count()
    }
}

/// Process each file independently with its own session.
///
/// A failing file is recorded and skipped; nothing is written for it.
pub fn run_batch(
    files: &[PathBuf],
    formatter: &dyn Formatter,
    config: &Config,
    dry_run: bool,
) -> BatchReport {
    let mut report = BatchReport::default();
    for path in files {
        let result = process_file(path, formatter, config, dry_run);
        match &result {
            Ok(FileOutcome::Unchanged) => info!(path = %path.display(), "unchanged"),
            Ok(_) => info!(path = %path.display(), "updated"),
            Err(err) => warn!(path = %path.display(), error = %err, "skipped"),
        }
        report.files.push(FileReport {
            path: path.clone(),
            result,
        });
    }
    report
}

/// Process one file according to the configured output mode.
pub fn process_file(
    path: &Path,
    formatter: &dyn Formatter,
    config: &Config,
    dry_run: bool,
) -> Result<FileOutcome, SessionError> {
    let mut session = Session::new(formatter, config.style.clone());
    session.open(path)?;

    let diff = session.diff()?;
    if diff.is_empty() {
        session.release();
        return Ok(FileOutcome::Unchanged);
    }

    let dest = destination(path, &config.output);
    let outcome = match config.output.mode {
        OutputMode::Patch => {
            if !dry_run {
                if let Some(dir) = dest.parent().filter(|d| !d.as_os_str().is_empty()) {
                    fs::create_dir_all(dir).map_err(|source| SessionError::Write {
                        path: dir.to_path_buf(),
                        source,
                    })?;
                }
                session.diff_to_file(&dest)?;
            }
            FileOutcome::Patched { patch: dest, diff }
        }
        OutputMode::Prefix | OutputMode::InPlace => {
            if !dry_run {
                session.write_target(&dest)?;
            }
            FileOutcome::Rewritten { dest, diff }
        }
    };
    session.release();
    Ok(outcome)
}
