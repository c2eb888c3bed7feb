//! Per-file processing: open, locate, regenerate, diff, write.

use crate::config::Style;
use crate::element::ElementTable;
use crate::formatter::{FormatError, Formatter};
use crate::locator::{locate, LocateError};
use crate::output::atomic_write;
use crate::rewrite::{rebuild, FileDiff};
use crate::source::SourceFile;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to open file \"{path}\": {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no file is open")]
    NoCurrentFile,

    #[error("{path}: {source}")]
    Locate { path: PathBuf, source: LocateError },

    #[error("{path}: {source}")]
    Format { path: PathBuf, source: FormatError },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Processing state for one source file at a time.
///
/// The file is read once when opened; locating and diffing both work from
/// that snapshot.
pub struct Session<'f> {
    formatter: &'f dyn Formatter,
    style: Style,
    source: Option<SourceFile>,
    table: Option<ElementTable>,
    regenerated: bool,
}

impl<'f> Session<'f> {
    pub fn new(formatter: &'f dyn Formatter, style: Style) -> Self {
        Self {
            formatter,
            style,
            source: None,
            table: None,
            regenerated: false,
        }
    }

    /// Open `path`, replacing any file currently held.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let source = SourceFile::open(path).map_err(|source| SessionError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(source);
        Ok(())
    }

    /// Use an already-read source.
    pub fn load(&mut self, source: SourceFile) {
        debug!(path = %source.path().display(), lines = source.line_count(), "opened");
        self.source = Some(source);
        self.table = None;
        self.regenerated = false;
    }

    pub fn source(&self) -> Option<&SourceFile> {
        self.source.as_ref()
    }

    /// Locate elements without regenerating them.
    pub fn parse(&mut self) -> Result<&ElementTable, SessionError> {
        let source = self.source.as_ref().ok_or(SessionError::NoCurrentFile)?;
        if self.table.is_none() {
            let table = locate(&source.lines(), self.formatter).map_err(|err| {
                SessionError::Locate {
                    path: source.path().to_path_buf(),
                    source: err,
                }
            })?;
            self.table = Some(table);
        }
        self.table.as_ref().ok_or(SessionError::NoCurrentFile)
    }

    /// Locate elements and regenerate every docstring in the configured style.
    pub fn proceed(&mut self) -> Result<&ElementTable, SessionError> {
        self.parse()?;
        let path = self.current_path()?;
        let table = self.table.as_mut().ok_or(SessionError::NoCurrentFile)?;
        if !self.regenerated {
            table
                .regenerate(self.formatter, &self.style.doc_type, &self.style.param_type)
                .map_err(|source| SessionError::Format { path, source })?;
            self.regenerated = true;
        }
        self.table.as_ref().ok_or(SessionError::NoCurrentFile)
    }

    /// Rewritten file contents.
    pub fn target_text(&mut self) -> Result<String, SessionError> {
        self.proceed()?;
        let (source, table) = self.parts()?;
        Ok(rebuild(&source.lines(), table).concat())
    }

    /// Unified diff between the original file and its rewrite.
    pub fn diff(&mut self) -> Result<FileDiff, SessionError> {
        self.proceed()?;
        let (source, table) = self.parts()?;
        let lines = source.lines();
        let target = rebuild(&lines, table);
        let diff = FileDiff::between(&source.basename(), &lines, &target);
        let (added, removed) = diff.stats();
        info!(path = %source.path().display(), added, removed, "diffed");
        Ok(diff)
    }

    /// Write the diff to `patch_file`. An empty diff still produces a file.
    pub fn diff_to_file(&mut self, patch_file: impl AsRef<Path>) -> Result<FileDiff, SessionError> {
        let patch_file = patch_file.as_ref();
        let diff = self.diff()?;
        atomic_write(patch_file, diff.as_str().as_bytes()).map_err(|source| {
            SessionError::Write {
                path: patch_file.to_path_buf(),
                source,
            }
        })?;
        Ok(diff)
    }

    /// Write the rewritten file to `dest`.
    pub fn write_target(&mut self, dest: impl AsRef<Path>) -> Result<(), SessionError> {
        let dest = dest.as_ref();
        let target = self.target_text()?;
        atomic_write(dest, target.as_bytes()).map_err(|source| SessionError::Write {
            path: dest.to_path_buf(),
            source,
        })
    }

    /// Drop the current file and its element table.
    pub fn release(&mut self) {
        self.source = None;
        self.table = None;
        self.regenerated = false;
    }

    fn current_path(&self) -> Result<PathBuf, SessionError> {
        self.source
            .as_ref()
            .map(|s| s.path().to_path_buf())
            .ok_or(SessionError::NoCurrentFile)
    }

    fn parts(&self) -> Result<(&SourceFile, &ElementTable), SessionError> {
        match (&self.source, &self.table) {
            (Some(source), Some(table)) => Ok((source, table)),
            _ => Err(SessionError::NoCurrentFile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Span;
    use crate::formatter::{JavadocFormatter, VerbatimFormatter};
    use std::fs;

    const SOURCE: &str = "def add(a, b):\n    '''Add.'''\n    return a + b\n\n\ndef sub(a, b):\n    return a - b\n";

    #[test]
    fn test_operations_need_open_file() {
        let mut session = Session::new(&VerbatimFormatter, Style::default());
        assert!(matches!(session.parse(), Err(SessionError::NoCurrentFile)));
        assert!(matches!(session.diff(), Err(SessionError::NoCurrentFile)));
    }

    #[test]
    fn test_open_missing_file() {
        let mut session = Session::new(&VerbatimFormatter, Style::default());
        let err = session.open("/no/such/file.py").unwrap_err();
        assert!(matches!(err, SessionError::FileOpen { .. }));
        assert!(err.to_string().contains("/no/such/file.py"));
    }

    #[test]
    fn test_parse_and_release() {
        let mut session = Session::new(&VerbatimFormatter, Style::default());
        session.load(SourceFile::from_text("m.py", SOURCE));
        let spans: Vec<Span> = session.parse().unwrap().iter().map(|e| e.span).collect();
        assert_eq!(
            spans,
            vec![
                Span::Present { start: 1, end: 1 },
                Span::Absent { header_line: 5 }
            ]
        );
        session.release();
        assert!(session.source().is_none());
        assert!(matches!(session.parse(), Err(SessionError::NoCurrentFile)));
    }

    #[test]
    fn test_diff_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.py");
        fs::write(&path, SOURCE).unwrap();

        let mut session = Session::new(&JavadocFormatter, Style::default());
        session.open(&path).unwrap();
        let patch = dir.path().join("m.py.patch");
        let diff = session.diff_to_file(&patch).unwrap();

        let written = fs::read_to_string(&patch).unwrap();
        assert_eq!(written, diff.as_str());
        assert!(written.starts_with("--- a/m.py\n+++ b/m.py\n"));
        assert!(written.contains("+    \"\"\"\n"));
        assert!(written.contains("+    @param a:\n"));
        assert_eq!(fs::read_to_string(&path).unwrap(), SOURCE);
    }

    #[test]
    fn test_unterminated_docstring_is_locate_error() {
        let mut session = Session::new(&VerbatimFormatter, Style::default());
        session.load(SourceFile::from_text("bad.py", "def a():\n    \"\"\"x\ndef b():\n"));
        let err = session.diff().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Locate {
                source: LocateError::UnterminatedDocBlock { header_line: 2, opened_at: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_style_is_format_error() {
        let style = Style {
            doc_type: "normal".to_string(),
            param_type: "google".to_string(),
        };
        let mut session = Session::new(&JavadocFormatter, style);
        session.load(SourceFile::from_text("m.py", SOURCE));
        assert!(matches!(session.proceed(), Err(SessionError::Format { .. })));
    }

    #[test]
    fn test_write_target_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.py");
        fs::write(&path, SOURCE).unwrap();

        let mut session = Session::new(&JavadocFormatter, Style::default());
        session.open(&path).unwrap();
        session.write_target(&path).unwrap();
        let rewritten = fs::read_to_string(&path).unwrap();
        assert_ne!(rewritten, SOURCE);
        assert!(rewritten.contains("def sub(a, b):\n    \"\"\"\n"));
        assert!(rewritten.contains("    '''Add.\n\n    @param a:\n    @param b:\n\n    '''\n"));
    }
}
