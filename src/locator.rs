//! Element locator: a single pass over the source lines that finds
//! declaration headers and the docstring span attached to each.
//!
//! The pass is a small state machine:
//!
//! - `Scanning`: outside any docstring window, lines are ignored.
//! - `AwaitingDoc`: a header was just seen; blank lines are skipped and the
//!   first non-blank line decides whether a docstring follows.
//! - `InDocSingle`: opener and closer on the same line. Transient: it is
//!   resolved before `feed` returns and never seen by the next line.
//! - `InDocMulti`: accumulating lines until the opening delimiter reappears.
//!
//! A multi-line block closes on the first later line containing its opening
//! delimiter; there is no escape or nesting awareness. A block still open at
//! end of input is dropped and its element stays undocumented.

use crate::delimiter::Delimiter;
use crate::element::{Element, ElementKind, ElementTable, Span};
use crate::formatter::Formatter;
use thiserror::Error;
use tracing::{debug, warn};

/// Line fields are zero-based; messages print them one-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error(
        "new declaration at line {} encountered before the docstring opened at line {} was closed",
        .header_line + 1,
        .opened_at + 1
    )]
    UnterminatedDocBlock { header_line: usize, opened_at: usize },
}

#[derive(Debug)]
enum State {
    Scanning,
    AwaitingDoc,
    InDocSingle {
        line: usize,
        raw: String,
    },
    InDocMulti {
        delimiter: Delimiter,
        start: usize,
        raw: String,
    },
}

/// Streams lines into an [`ElementTable`].
pub struct Locator<'f> {
    formatter: &'f dyn Formatter,
    table: ElementTable,
    state: State,
}

impl<'f> Locator<'f> {
    pub fn new(formatter: &'f dyn Formatter) -> Self {
        Self {
            formatter,
            table: ElementTable::new(),
            state: State::Scanning,
        }
    }

    /// Feed the line at index `index`. `line` keeps its terminator.
    pub fn feed(&mut self, index: usize, line: &str) -> Result<(), LocateError> {
        let trimmed = line.trim();

        if let Some(kind) = ElementKind::classify(trimmed) {
            return self.header(index, line, trimmed, kind);
        }

        let next = match std::mem::replace(&mut self.state, State::Scanning) {
            // InDocSingle never outlives the feed call that produced it.
            State::Scanning | State::InDocSingle { .. } => State::Scanning,
            State::AwaitingDoc => self.await_doc(index, line, trimmed),
            State::InDocMulti {
                delimiter,
                start,
                mut raw,
            } => {
                raw.push_str(line);
                if delimiter.is_in(trimmed) {
                    self.close(start, index, raw);
                    State::Scanning
                } else {
                    State::InDocMulti {
                        delimiter,
                        start,
                        raw,
                    }
                }
            }
        };

        self.state = match next {
            State::InDocSingle { line: start, raw } => {
                self.close(start, start, raw);
                State::Scanning
            }
            other => other,
        };
        Ok(())
    }

    /// Finish the pass and hand back the table.
    ///
    /// A block still open here is discarded; the element keeps its absent
    /// span.
    pub fn finish(self) -> ElementTable {
        if let State::InDocMulti { start, .. } = self.state {
            warn!(opened_at = start, "docstring still open at end of input, ignored");
        }
        self.table
    }

    fn header(
        &mut self,
        index: usize,
        line: &str,
        trimmed: &str,
        kind: ElementKind,
    ) -> Result<(), LocateError> {
        if let State::InDocMulti { start, .. } = &self.state {
            return Err(LocateError::UnterminatedDocBlock {
                header_line: index,
                opened_at: *start,
            });
        }

        let indent = &line[..line.len() - line.trim_start().len()];
        debug!(line = index, ?kind, header = trimmed, "declaration");
        self.table.push(Element::new(index, trimmed, kind, indent));
        self.state = State::AwaitingDoc;
        Ok(())
    }

    fn await_doc(&self, index: usize, line: &str, trimmed: &str) -> State {
        if trimmed.is_empty() {
            return State::AwaitingDoc;
        }
        let Some((delimiter, _)) = Delimiter::find_opener(trimmed) else {
            debug!(line = index, "no docstring");
            return State::Scanning;
        };

        if delimiter.count_in(trimmed) >= 2 {
            State::InDocSingle {
                line: index,
                raw: line.to_string(),
            }
        } else {
            State::InDocMulti {
                delimiter,
                start: index,
                raw: line.to_string(),
            }
        }
    }

    fn close(&mut self, start: usize, end: usize, raw: String) {
        let structured = self.formatter.parse(&raw);
        if let Some(element) = self.table.last_mut() {
            debug!(header = element.line, start, end, "docstring");
            element.span = Span::Present { start, end };
            element.doc_block.indent = raw[..raw.len() - raw.trim_start().len()].to_string();
            element.doc_block.structured = Some(structured);
            element.doc_block.raw = raw;
        }
    }
}

/// Locate every element in `lines`.
pub fn locate<S: AsRef<str>>(
    lines: &[S],
    formatter: &dyn Formatter,
) -> Result<ElementTable, LocateError> {
    let mut locator = Locator::new(formatter);
    for (index, line) in lines.iter().enumerate() {
        locator.feed(index, line.as_ref())?;
    }
    Ok(locator.finish())
}
