//! Element table: declarations, their docstring spans and owned doc blocks.

use crate::formatter::{FormatError, Formatter, StructuredDoc};
use serde::Serialize;

/// Kind of declaration an element was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Function,
    Class,
}

impl ElementKind {
    /// Classify a trimmed line as a declaration header.
    pub fn classify(trimmed: &str) -> Option<Self> {
        if trimmed.starts_with("def ") {
            Some(ElementKind::Function)
        } else if trimmed.starts_with("class ") {
            Some(ElementKind::Class)
        } else {
            None
        }
    }
}

/// Inclusive line range of a docstring in the original file.
///
/// `Absent` means the declaration has no docstring; regenerated text is
/// inserted immediately after `header_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Span {
    Absent { header_line: usize },
    Present { start: usize, end: usize },
}

impl Span {
    /// Line used to order spans within a table.
    pub fn anchor(&self) -> usize {
        match *self {
            Span::Absent { header_line } => header_line,
            Span::Present { start, .. } => start,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Span::Present { .. })
    }

    /// Legacy signed encoding: `(-h, -h)` for an absent docstring.
    ///
    /// Note that a header on line 0 encodes as `(0, 0)`, which is why the
    /// tagged form is used everywhere else.
    pub fn to_signed(&self) -> (i64, i64) {
        match *self {
            Span::Absent { header_line } => (-(header_line as i64), -(header_line as i64)),
            Span::Present { start, end } => (start as i64, end as i64),
        }
    }
}

/// Docstring text owned by one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Captured lines, delimiters and line terminators included.
    pub raw: String,
    /// Indentation a regenerated block should use.
    pub indent: String,
    pub structured: Option<StructuredDoc>,
    pub rendered: Option<String>,
}

impl DocBlock {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            ..Self::default()
        }
    }

    /// Regenerate this block in place.
    ///
    /// Blocks the locator never parsed (undocumented declarations) are seeded
    /// from the declaration header.
    pub fn regenerate(
        &mut self,
        formatter: &dyn Formatter,
        header: &str,
        doc_type: &str,
        param_type: &str,
    ) -> Result<(), FormatError> {
        let structured = self
            .structured
            .get_or_insert_with(|| formatter.seed(header, &self.indent));
        formatter.complete(structured, header);
        self.rendered = Some(formatter.render(structured, doc_type, param_type)?);
        Ok(())
    }

    /// Text that should stand in for the original block, if it changed.
    ///
    /// `None` means the original lines are kept verbatim.
    pub fn replacement(&self) -> Option<&str> {
        match self.rendered.as_deref() {
            Some(text) if text != self.raw => Some(text),
            _ => None,
        }
    }
}

/// One recognized declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Zero-based index of the header line.
    pub line: usize,
    pub header_text: String,
    pub kind: ElementKind,
    pub doc_block: DocBlock,
    pub span: Span,
}

impl Element {
    pub fn new(line: usize, header_text: impl Into<String>, kind: ElementKind, indent: &str) -> Self {
        Self {
            line,
            header_text: header_text.into(),
            kind,
            doc_block: DocBlock::new(format!("{indent}    ")),
            span: Span::Absent { header_line: line },
        }
    }
}

/// Elements in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementTable {
    elements: Vec<Element>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn last_mut(&mut self) -> Option<&mut Element> {
        self.elements.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.elements.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Check that span anchors strictly increase across the table.
    pub fn is_monotonic(&self) -> bool {
        self.elements
            .windows(2)
            .all(|pair| pair[0].span.anchor() < pair[1].span.anchor())
    }

    /// Regenerate every doc block with the given style.
    pub fn regenerate(
        &mut self,
        formatter: &dyn Formatter,
        doc_type: &str,
        param_type: &str,
    ) -> Result<(), FormatError> {
        for element in &mut self.elements {
            element
                .doc_block
                .regenerate(formatter, &element.header_text, doc_type, param_type)?;
        }
        Ok(())
    }

    /// Serializable view of the table.
    pub fn summary(&self) -> Vec<ElementSummary<'_>> {
        self.elements
            .iter()
            .map(|e| ElementSummary {
                line: e.line,
                kind: e.kind,
                header: &e.header_text,
                span: e.span,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ElementTable {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[derive(Debug, Serialize)]
pub struct ElementSummary<'a> {
    pub line: usize,
    pub kind: ElementKind,
    pub header: &'a str,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::VerbatimFormatter;

    #[test]
    fn test_classify_headers() {
        assert_eq!(ElementKind::classify("def f():"), Some(ElementKind::Function));
        assert_eq!(ElementKind::classify("class A(object):"), Some(ElementKind::Class));
        assert_eq!(ElementKind::classify("define = 1"), None);
        assert_eq!(ElementKind::classify("classic = 2"), None);
    }

    #[test]
    fn test_span_signed_encoding() {
        assert_eq!(Span::Absent { header_line: 2 }.to_signed(), (-2, -2));
        assert_eq!(Span::Present { start: 1, end: 3 }.to_signed(), (1, 3));
    }

    #[test]
    fn test_span_anchor() {
        assert_eq!(Span::Absent { header_line: 7 }.anchor(), 7);
        assert_eq!(Span::Present { start: 3, end: 9 }.anchor(), 3);
    }

    #[test]
    fn test_element_defaults_to_absent_span() {
        let element = Element::new(4, "def f():", ElementKind::Function, "  ");
        assert_eq!(element.span, Span::Absent { header_line: 4 });
        assert_eq!(element.doc_block.indent, "      ");
        assert!(element.doc_block.raw.is_empty());
    }

    #[test]
    fn test_monotonic_check() {
        let mut table = ElementTable::new();
        let mut a = Element::new(0, "def a():", ElementKind::Function, "");
        a.span = Span::Present { start: 1, end: 2 };
        table.push(a);
        table.push(Element::new(3, "def b():", ElementKind::Function, ""));
        assert!(table.is_monotonic());

        table.push(Element::new(1, "def c():", ElementKind::Function, ""));
        assert!(!table.is_monotonic());
    }

    #[test]
    fn test_verbatim_regeneration_has_no_replacement() {
        let mut block = DocBlock::new("    ");
        block.raw = "    \"\"\"doc\"\"\"\n".to_string();
        block.structured = Some(VerbatimFormatter.parse(&block.raw));
        block
            .regenerate(&VerbatimFormatter, "def f():", "normal", "standard")
            .unwrap();
        assert_eq!(block.replacement(), None);
    }
}
