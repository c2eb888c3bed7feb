//! Docstring formatters.
//!
//! A formatter turns the raw text the locator captured into a
//! [`StructuredDoc`] and renders it back out in a configured style. The
//! locator and rewrite engine only ever see this trait.

mod javadoc;
mod signature;
mod verbatim;

pub use javadoc::JavadocFormatter;
pub use signature::signature_params;
pub use verbatim::VerbatimFormatter;

use thiserror::Error;

/// Block layouts understood by the built-in formatter.
pub const DOC_TYPES: &[&str] = &["normal"];

/// Parameter dialects understood by the built-in formatter.
pub const PARAM_TYPES: &[&str] = &["standard", "restructuredtext"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown doc type '{0}'")]
    UnknownDocType(String),

    #[error("unknown param type '{0}'")]
    UnknownParamType(String),
}

/// A documented parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub description: String,
    pub type_name: Option<String>,
}

impl Param {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A documented exception.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raise {
    pub name: String,
    pub description: String,
}

/// Docstring content split into description and fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDoc {
    pub indent: String,
    /// String prefix written before the delimiter, e.g. `r`.
    pub prefix: String,
    pub delimiter: Option<crate::delimiter::Delimiter>,
    pub description: String,
    pub params: Vec<Param>,
    pub returns: Option<String>,
    pub rtype: Option<String>,
    pub raises: Vec<Raise>,
    /// Field lines the parser did not recognize, kept verbatim.
    pub extra: Vec<String>,
    /// The text this doc was parsed from.
    pub raw: String,
    /// Opener and closer were captured on the same line.
    pub single_line: bool,
}

impl StructuredDoc {
    pub fn has_fields(&self) -> bool {
        !self.params.is_empty()
            || self.returns.is_some()
            || self.rtype.is_some()
            || !self.raises.is_empty()
            || !self.extra.is_empty()
    }

    pub fn param_mut(&mut self, name: &str) -> &mut Param {
        let idx = match self.params.iter().position(|p| p.name == name) {
            Some(idx) => idx,
            None => {
                self.params.push(Param::named(name));
                self.params.len() - 1
            }
        };
        &mut self.params[idx]
    }
}

/// Converts between raw docstring text and [`StructuredDoc`].
pub trait Formatter {
    /// Interpret a captured docstring, delimiters included.
    fn parse(&self, raw: &str) -> StructuredDoc;

    /// Build the content for a declaration that has no docstring yet.
    fn seed(&self, header: &str, indent: &str) -> StructuredDoc;

    /// Bring a parsed doc in line with its declaration header.
    fn complete(&self, _doc: &mut StructuredDoc, _header: &str) {}

    /// Render a doc in the requested style.
    fn render(
        &self,
        doc: &StructuredDoc,
        doc_type: &str,
        param_type: &str,
    ) -> Result<String, FormatError>;
}
