//! Pydoc Patcher: locate and regenerate Python docstrings
//!
//! Finds the docstring attached to every `def` / `class` declaration in a
//! Python source file, regenerates it through a [`Formatter`], and emits a
//! unified diff between the original file and the file with the new
//! docstrings spliced in.
//!
//! # Architecture
//!
//! - [`locator`] makes one pass over the file's lines and produces an
//!   [`ElementTable`]: each declaration with the [`Span`] of its docstring.
//! - A [`Formatter`] parses each captured docstring and renders it in the
//!   configured style.
//! - [`rewrite`] copies every untouched line and substitutes regenerated
//!   text at each span, then diffs the result against the original.
//!
//! Only docstring spans ever change; all other lines keep their content and
//! order.
//!
//! # Example
//!
//! ```
//! use pydoc_patcher::{locate, rebuild, FileDiff, JavadocFormatter};
//!
//! let lines = ["def area(w, h):\n", "    return w * h\n"];
//! let mut table = locate(&lines, &JavadocFormatter).unwrap();
//! table.regenerate(&JavadocFormatter, "normal", "standard").unwrap();
//!
//! let target = rebuild(&lines, &table);
//! let diff = FileDiff::between("area.py", &lines, &target);
//! assert!(diff.as_str().contains("+    @param w:\n"));
//! ```

pub mod batch;
pub mod config;
pub mod delimiter;
pub mod discover;
pub mod element;
pub mod formatter;
pub mod locator;
pub mod output;
pub mod rewrite;
pub mod session;
pub mod source;

// Re-exports
pub use batch::{process_file, run_batch, BatchReport, FileOutcome, FileReport};
pub use config::{
    load_from_path, load_from_str, load_or_default, Config, ConfigError, ConfigOrigin,
    OutputMode,
};
pub use delimiter::Delimiter;
pub use discover::{discover_files, DiscoverError};
pub use element::{DocBlock, Element, ElementKind, ElementTable, Span};
pub use formatter::{
    FormatError, Formatter, JavadocFormatter, Param, Raise, StructuredDoc, VerbatimFormatter,
};
pub use locator::{locate, LocateError, Locator};
pub use rewrite::{rebuild, FileDiff};
pub use session::{Session, SessionError};
pub use source::SourceFile;
