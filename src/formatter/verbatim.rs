use super::{FormatError, Formatter, StructuredDoc};

/// Renders every docstring exactly as it was captured.
///
/// Undocumented declarations stay undocumented. Useful for checking that a
/// file survives a locate/rewrite cycle untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimFormatter;

impl Formatter for VerbatimFormatter {
    fn parse(&self, raw: &str) -> StructuredDoc {
        StructuredDoc {
            raw: raw.to_string(),
            ..StructuredDoc::default()
        }
    }

    fn seed(&self, _header: &str, indent: &str) -> StructuredDoc {
        StructuredDoc {
            indent: indent.to_string(),
            ..StructuredDoc::default()
        }
    }

    fn render(
        &self,
        doc: &StructuredDoc,
        _doc_type: &str,
        _param_type: &str,
    ) -> Result<String, FormatError> {
        Ok(doc.raw.clone())
    }
}
