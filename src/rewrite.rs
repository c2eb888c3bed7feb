//! Rewrite/diff engine: splice regenerated docstrings into the original
//! line sequence and diff the result against the original.
//!
//! Every original line outside a replaced span is carried over unchanged and
//! in order. Spans are trusted to be monotonic; a corrupted table produces
//! unspecified (but non-panicking) output.

use crate::element::{ElementTable, Span};
use similar::TextDiff;
use std::borrow::Cow;
use std::fmt;

/// Lines of context around each hunk.
pub const CONTEXT_LINES: usize = 3;

/// Build the target line sequence.
///
/// Lines are borrowed from `lines` wherever they are carried over.
pub fn rebuild<'a, S: AsRef<str>>(lines: &'a [S], table: &'a ElementTable) -> Vec<Cow<'a, str>> {
    let eol = line_ending(lines);
    let mut target: Vec<Cow<'a, str>> = Vec::with_capacity(lines.len());
    let mut last = 0;

    let copy = |target: &mut Vec<Cow<'a, str>>, from: usize, to: usize| {
        let to = to.min(lines.len());
        if let Some(slice) = lines.get(from..to) {
            target.extend(slice.iter().map(|l| Cow::Borrowed(l.as_ref())));
        }
    };

    for element in table {
        let (block_start, resume) = match element.span {
            Span::Absent { header_line } => (header_line + 1, header_line + 1),
            Span::Present { start, end } => (start, end + 1),
        };
        copy(&mut target, last, block_start);

        match element.doc_block.replacement() {
            Some(text) => {
                terminate_last(&mut target, eol);
                target.extend(replacement_lines(text, eol));
            }
            None => copy(&mut target, block_start, resume),
        }
        last = resume;
    }
    copy(&mut target, last, lines.len());
    target
}

/// Inserted lines must not run on from a final line without a terminator.
fn terminate_last(target: &mut [Cow<'_, str>], eol: &str) {
    if let Some(last) = target.last_mut() {
        if !last.ends_with('\n') {
            last.to_mut().push_str(eol);
        }
    }
}

/// Split regenerated text into literal lines terminated with `eol`.
fn replacement_lines<'a>(text: &'a str, eol: &str) -> impl Iterator<Item = Cow<'a, str>> + 'a {
    let eol = eol.to_string();
    text.split_inclusive('\n').map(move |line| {
        if line.ends_with(eol.as_str()) {
            Cow::Borrowed(line)
        } else {
            let body = line.trim_end_matches(['\r', '\n']);
            Cow::Owned(format!("{body}{eol}"))
        }
    })
}

fn line_ending<S: AsRef<str>>(lines: &[S]) -> &'static str {
    match lines.first() {
        Some(line) if line.as_ref().ends_with("\r\n") => "\r\n",
        _ => "\n",
    }
}

/// A unified diff between an original file and its rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub from_label: String,
    pub to_label: String,
    text: String,
}

impl FileDiff {
    /// Diff two line sequences, labelling them `a/<name>` and `b/<name>`.
    pub fn between<A: AsRef<str>, B: AsRef<str>>(name: &str, original: &[A], target: &[B]) -> Self {
        let from_label = format!("a/{name}");
        let to_label = format!("b/{name}");
        let before: String = original.iter().map(AsRef::as_ref).collect();
        let after: String = target.iter().map(AsRef::as_ref).collect();

        let text = if before == after {
            String::new()
        } else {
            TextDiff::from_lines(&before, &after)
                .unified_diff()
                .context_radius(CONTEXT_LINES)
                .header(&from_label, &to_label)
                .to_string()
        };

        Self {
            from_label,
            to_label,
            text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Diff lines, each newline-terminated.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split_inclusive('\n')
    }

    /// Count of added and removed lines.
    pub fn stats(&self) -> (usize, usize) {
        self.lines().fold((0, 0), |(add, del), line| {
            if line.starts_with("+++") || line.starts_with("---") {
                (add, del)
            } else if line.starts_with('+') {
                (add + 1, del)
            } else if line.starts_with('-') {
                (add, del + 1)
            } else {
                (add, del)
            }
        })
    }
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
