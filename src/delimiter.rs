//! Triple-quote docstring delimiters.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Delimiter {
    /// `"""`
    Double,
    /// `'''`
    Single,
}

impl Delimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::Double => "\"\"\"",
            Delimiter::Single => "'''",
        }
    }

    /// Find the delimiter that opens a block on this line.
    ///
    /// When both styles occur, the one at the lower column wins. Returns the
    /// delimiter and its byte column.
    pub fn find_opener(line: &str) -> Option<(Delimiter, usize)> {
        let double = line.find(Delimiter::Double.as_str());
        let single = line.find(Delimiter::Single.as_str());
        match (double, single) {
            (Some(d), Some(s)) if s < d => Some((Delimiter::Single, s)),
            (Some(d), _) => Some((Delimiter::Double, d)),
            (None, Some(s)) => Some((Delimiter::Single, s)),
            (None, None) => None,
        }
    }

    /// Non-overlapping occurrences of this delimiter in `line`.
    pub fn count_in(self, line: &str) -> usize {
        line.matches(self.as_str()).count()
    }

    pub fn is_in(self, line: &str) -> bool {
        line.contains(self.as_str())
    }
}
