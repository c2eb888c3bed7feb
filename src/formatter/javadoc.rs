//! Field-list docstrings in javadoc (`@param`) or reST (`:param:`) dialect.

use super::{signature_params, FormatError, Formatter, Param, Raise, StructuredDoc};
use crate::delimiter::Delimiter;

/// Built-in formatter for the `normal` layout.
///
/// Parses both field dialects regardless of configuration and renders in the
/// one requested:
///
/// ```text
/// """Description on the first line.
///
/// @param name: what it is
/// @return: what comes back
///
/// """
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JavadocFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Javadoc,
    Rest,
}

impl Dialect {
    fn from_param_type(param_type: &str) -> Result<Self, FormatError> {
        match param_type {
            "standard" => Ok(Dialect::Javadoc),
            "restructuredtext" => Ok(Dialect::Rest),
            other => Err(FormatError::UnknownParamType(other.to_string())),
        }
    }

    fn lead(self) -> char {
        match self {
            Dialect::Javadoc => '@',
            Dialect::Rest => ':',
        }
    }

    fn returns_tag(self) -> &'static str {
        match self {
            Dialect::Javadoc => "return",
            Dialect::Rest => "returns",
        }
    }

    fn raise_tag(self) -> &'static str {
        match self {
            Dialect::Javadoc => "raise",
            Dialect::Rest => "raises",
        }
    }
}

/// Which field a continuation line belongs to.
#[derive(Debug, Clone, Copy)]
enum Target {
    Description,
    Param(usize),
    Returns,
    Raise(usize),
    Extra,
}

impl Formatter for JavadocFormatter {
    fn parse(&self, raw: &str) -> StructuredDoc {
        let mut doc = StructuredDoc {
            raw: raw.to_string(),
            ..StructuredDoc::default()
        };

        let first = raw.lines().next().unwrap_or("");
        let Some((delimiter, column)) = Delimiter::find_opener(first) else {
            doc.description = raw.trim().to_string();
            return doc;
        };
        let leading = first.len() - first.trim_start().len();
        doc.indent = first[..leading].to_string();
        doc.prefix = first[leading..column].to_string();
        doc.delimiter = Some(delimiter);
        doc.single_line = !raw.trim_end().contains('\n');

        let marker = delimiter.as_str();
        let body_start = column + marker.len();
        let rest = &raw[body_start..];
        let body = match rest.rfind(marker) {
            Some(end) => &rest[..end],
            None => rest,
        };

        let mut target = Target::Description;
        let mut description: Vec<&str> = Vec::new();

        for line in body.lines() {
            let text = line.trim();
            if let Some(field) = parse_field(text) {
                target = apply_field(&mut doc, field);
                continue;
            }
            match target {
                Target::Description => description.push(dedent(line, &doc.indent)),
                _ if text.is_empty() => target = Target::Extra,
                Target::Param(idx) => {
                    append(&mut doc.params[idx].description, dedent(line, &doc.indent))
                }
                Target::Returns => append(
                    doc.returns.get_or_insert_with(String::new),
                    dedent(line, &doc.indent),
                ),
                Target::Raise(idx) => {
                    append(&mut doc.raises[idx].description, dedent(line, &doc.indent))
                }
                Target::Extra => doc.extra.push(dedent(line, &doc.indent).to_string()),
            }
        }

        while description.last().is_some_and(|l| l.trim().is_empty()) {
            description.pop();
        }
        while description.first().is_some_and(|l| l.trim().is_empty()) {
            description.remove(0);
        }
        doc.description = description.join("\n");
        doc
    }

    fn seed(&self, header: &str, indent: &str) -> StructuredDoc {
        let mut doc = StructuredDoc {
            indent: indent.to_string(),
            ..StructuredDoc::default()
        };
        doc.params = signature_params(header).into_iter().map(Param::named).collect();
        doc
    }

    /// Append signature parameters the docstring does not mention.
    fn complete(&self, doc: &mut StructuredDoc, header: &str) {
        for name in signature_params(header) {
            if !doc.params.iter().any(|p| p.name == name) {
                doc.params.push(Param::named(name));
            }
        }
    }

    fn render(
        &self,
        doc: &StructuredDoc,
        doc_type: &str,
        param_type: &str,
    ) -> Result<String, FormatError> {
        if !super::DOC_TYPES.contains(&doc_type) {
            return Err(FormatError::UnknownDocType(doc_type.to_string()));
        }
        let dialect = Dialect::from_param_type(param_type)?;

        let indent = doc.indent.as_str();
        let open = format!(
            "{}{}",
            doc.prefix,
            doc.delimiter.unwrap_or(Delimiter::Double).as_str()
        );
        let close = doc.delimiter.unwrap_or(Delimiter::Double).as_str();

        let mut description = doc.description.lines();
        let first = description.next().unwrap_or("");
        let rest: Vec<&str> = description.collect();

        if doc.single_line && !doc.has_fields() && rest.is_empty() {
            return Ok(format!("{indent}{open}{first}{close}\n"));
        }

        let mut lines = vec![format!("{indent}{open}{first}")];
        lines.extend(rest.iter().map(|l| format!("{indent}{l}")));

        if doc.has_fields() {
            lines.push(String::new());
            lines.extend(render_fields(doc, dialect).into_iter().map(|l| format!("{indent}{l}")));
        }
        lines.push(String::new());
        lines.push(format!("{indent}{close}"));

        let mut out = String::new();
        for line in lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out)
    }
}

fn render_fields(doc: &StructuredDoc, dialect: Dialect) -> Vec<String> {
    let lead = dialect.lead();
    let mut fields = Vec::new();

    for param in &doc.params {
        fields.push(format!("{lead}param {}: {}", param.name, param.description));
        if let Some(type_name) = &param.type_name {
            fields.push(format!("{lead}type {}: {}", param.name, type_name));
        }
    }
    if let Some(returns) = &doc.returns {
        fields.push(format!("{lead}{}: {returns}", dialect.returns_tag()));
    }
    if let Some(rtype) = &doc.rtype {
        fields.push(format!("{lead}rtype: {rtype}"));
    }
    for raise in &doc.raises {
        fields.push(format!("{lead}{} {}: {}", dialect.raise_tag(), raise.name, raise.description));
    }
    fields.extend(doc.extra.iter().cloned());

    // Multi-line descriptions continue on their own lines.
    fields
        .into_iter()
        .flat_map(|f| f.lines().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

#[derive(Debug)]
enum Field<'a> {
    Param { name: &'a str, type_name: Option<&'a str>, text: &'a str },
    Type { name: &'a str, text: &'a str },
    Returns(&'a str),
    Rtype(&'a str),
    Raise { name: &'a str, text: &'a str },
    Other(&'a str),
}

/// Recognize `@tag args: text` or `:tag args: text`.
fn parse_field(line: &str) -> Option<Field<'_>> {
    let body = line.strip_prefix('@').or_else(|| line.strip_prefix(':'))?;
    let colon = body.find(':')?;
    let head = &body[..colon];
    let text = body[colon + 1..].trim();
    let mut words = head.split_whitespace();
    let tag = words.next()?;
    let args: Vec<&str> = words.collect();

    let field = match (tag, args.as_slice()) {
        ("param" | "parameter" | "arg" | "argument", &[name]) => Field::Param {
            name,
            type_name: None,
            text,
        },
        ("param" | "parameter" | "arg" | "argument", &[type_name, name]) => Field::Param {
            name,
            type_name: Some(type_name),
            text,
        },
        ("type", &[name]) => Field::Type { name, text },
        ("return" | "returns", &[]) => Field::Returns(text),
        ("rtype", &[]) => Field::Rtype(text),
        ("raise" | "raises" | "except" | "exception", &[name]) => Field::Raise { name, text },
        _ => Field::Other(line),
    };
    Some(field)
}

fn apply_field(doc: &mut StructuredDoc, field: Field<'_>) -> Target {
    match field {
        Field::Param { name, type_name, text } => {
            let param = doc.param_mut(name);
            param.description = text.to_string();
            if let Some(t) = type_name {
                param.type_name = Some(t.to_string());
            }
            let idx = doc.params.iter().position(|p| p.name == name).unwrap_or(0);
            Target::Param(idx)
        }
        Field::Type { name, text } => {
            doc.param_mut(name).type_name = Some(text.to_string());
            Target::Extra
        }
        Field::Returns(text) => {
            doc.returns = Some(text.to_string());
            Target::Returns
        }
        Field::Rtype(text) => {
            doc.rtype = Some(text.to_string());
            Target::Extra
        }
        Field::Raise { name, text } => {
            doc.raises.push(Raise {
                name: name.to_string(),
                description: text.to_string(),
            });
            Target::Raise(doc.raises.len() - 1)
        }
        Field::Other(line) => {
            doc.extra.push(line.to_string());
            Target::Extra
        }
    }
}

fn append(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(text);
}

/// Strip the block indentation from a description line.
fn dedent<'a>(line: &'a str, indent: &str) -> &'a str {
    let line = line.trim_end();
    line.strip_prefix(indent).unwrap_or_else(|| line.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_javadoc_fields() {
        let raw = concat!(
            "    \"\"\"Set the configuration.\n",
            "\n",
            "    @param input_file: path name\n",
            "    @param output_prefix: added at the beginning\n",
            "    of each file\n",
            "    @return: the result\n",
            "    @rtype: str\n",
            "\n",
            "    \"\"\"\n",
        );
        let doc = JavadocFormatter.parse(raw);
        assert_eq!(doc.indent, "    ");
        assert_eq!(doc.delimiter, Some(Delimiter::Double));
        assert_eq!(doc.description, "Set the configuration.");
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params[0].name, "input_file");
        assert_eq!(doc.params[1].description, "added at the beginning\nof each file");
        assert_eq!(doc.returns.as_deref(), Some("the result"));
        assert_eq!(doc.rtype.as_deref(), Some("str"));
    }

    #[test]
    fn test_parse_rest_fields() {
        let raw = "  '''Do it.\n\n  :param int x: the x\n  :raises ValueError: when bad\n  '''\n";
        let doc = JavadocFormatter.parse(raw);
        assert_eq!(doc.delimiter, Some(Delimiter::Single));
        assert_eq!(doc.params[0].name, "x");
        assert_eq!(doc.params[0].type_name.as_deref(), Some("int"));
        assert_eq!(doc.raises[0].name, "ValueError");
        assert_eq!(doc.raises[0].description, "when bad");
    }

    #[test]
    fn test_parse_one_line() {
        let doc = JavadocFormatter.parse("    r\"\"\"Short.\"\"\"\n");
        assert_eq!(doc.prefix, "r");
        assert_eq!(doc.description, "Short.");
        assert!(!doc.has_fields());
    }

    #[test]
    fn test_render_normal_standard() {
        let raw = "    \"\"\"Describe.\n    @param a: first\n    @return: sum\"\"\"\n";
        let doc = JavadocFormatter.parse(raw);
        let out = JavadocFormatter.render(&doc, "normal", "standard").unwrap();
        assert_eq!(
            out,
            "    \"\"\"Describe.\n\n    @param a: first\n    @return: sum\n\n    \"\"\"\n"
        );
    }

    #[test]
    fn test_render_converts_dialect() {
        let raw = "    \"\"\"Describe.\n\n    @param a: first\n    @raise KeyError: missing\n\n    \"\"\"\n";
        let doc = JavadocFormatter.parse(raw);
        let out = JavadocFormatter.render(&doc, "normal", "restructuredtext").unwrap();
        assert_eq!(
            out,
            "    \"\"\"Describe.\n\n    :param a: first\n    :raises KeyError: missing\n\n    \"\"\"\n"
        );
    }

    #[test]
    fn test_render_normal_layout_is_stable() {
        let raw = "    \"\"\"Describe.\n\n    @param a: first\n\n    \"\"\"\n";
        let doc = JavadocFormatter.parse(raw);
        assert_eq!(JavadocFormatter.render(&doc, "normal", "standard").unwrap(), raw);
    }

    #[test]
    fn test_render_one_line_stays_one_line() {
        let raw = "    \"\"\"Short.\"\"\"\n";
        let doc = JavadocFormatter.parse(raw);
        assert_eq!(JavadocFormatter.render(&doc, "normal", "standard").unwrap(), raw);
    }

    #[test]
    fn test_seed_from_header() {
        let doc = JavadocFormatter.seed("def f(self, a, b=2):", "        ");
        let out = JavadocFormatter.render(&doc, "normal", "standard").unwrap();
        assert_eq!(
            out,
            "        \"\"\"\n\n        @param a:\n        @param b:\n\n        \"\"\"\n"
        );
    }

    #[test]
    fn test_complete_appends_missing_params() {
        let mut doc = JavadocFormatter.parse("    \"\"\"Doc.\n\n    @param b: bee\n    \"\"\"\n");
        JavadocFormatter.complete(&mut doc, "def f(self, a, b):");
        let names: Vec<&str> = doc.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(doc.params[0].description, "bee");
    }

    #[test]
    fn test_seed_without_params() {
        let doc = JavadocFormatter.seed("class A(object):", "    ");
        let out = JavadocFormatter.render(&doc, "normal", "standard").unwrap();
        assert_eq!(out, "    \"\"\"\n\n    \"\"\"\n");
    }

    #[test]
    fn test_multi_line_block_without_fields_stays_multi_line() {
        let raw = "    '''Get the next docstring.\n\n    '''\n";
        let doc = JavadocFormatter.parse(raw);
        assert!(!doc.single_line);
        assert_eq!(JavadocFormatter.render(&doc, "normal", "standard").unwrap(), raw);

        let tight = JavadocFormatter.parse("    '''Get the next docstring.\n    '''\n");
        assert_eq!(JavadocFormatter.render(&tight, "normal", "standard").unwrap(), raw);
    }

    #[test]
    fn test_param_continuation_keeps_relative_indent() {
        let raw = concat!(
            "        '''Set the configuration.\n",
            "\n",
            "        @param doc_type: the docstring format. Can be:\n",
            "            - normal:\n",
            "                comment on the first line\n",
            "        @return: nothing\n",
            "\n",
            "        '''\n",
        );
        let doc = JavadocFormatter.parse(raw);
        assert_eq!(
            doc.params[0].description,
            "the docstring format. Can be:\n    - normal:\n        comment on the first line"
        );
        assert_eq!(JavadocFormatter.render(&doc, "normal", "standard").unwrap(), raw);
    }

    #[test]
    fn test_unknown_styles_rejected() {
        let doc = JavadocFormatter.seed("def f():", "");
        assert_eq!(
            JavadocFormatter.render(&doc, "numpy", "standard"),
            Err(FormatError::UnknownDocType("numpy".to_string()))
        );
        assert_eq!(
            JavadocFormatter.render(&doc, "normal", "google"),
            Err(FormatError::UnknownParamType("google".to_string()))
        );
    }
}
