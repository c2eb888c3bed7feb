use crate::formatter::{DOC_TYPES, PARAM_TYPES};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Contents of a `pydoc-patcher.toml` file.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub discovery: Discovery,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        check_known(&mut issues, "style.doc_type", &self.style.doc_type, DOC_TYPES);
        check_known(&mut issues, "style.param_type", &self.style.param_type, PARAM_TYPES);

        if self.output.mode == OutputMode::Prefix && self.output.prefix.trim().is_empty() {
            issues.push(ValidationIssue::InvalidCombo {
                message: "output mode 'prefix' requires a non-empty output.prefix".to_string(),
            });
        }
        if self.discovery.extensions.is_empty() {
            issues.push(ValidationIssue::MissingField {
                field: "discovery.extensions",
            });
        }
        for ext in &self.discovery.extensions {
            if ext.trim().is_empty() || ext.contains(['/', '\\']) {
                issues.push(ValidationIssue::InvalidCombo {
                    message: format!("invalid file extension '{ext}'"),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

fn check_known(
    issues: &mut Vec<ValidationIssue>,
    field: &'static str,
    value: &str,
    known: &[&str],
) {
    if known.contains(&value) {
        return;
    }
    let suggestion = known
        .iter()
        .map(|candidate| (strsim::levenshtein(value, candidate), *candidate))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string());
    issues.push(ValidationIssue::UnknownValue {
        field,
        value: value.to_string(),
        suggestion,
    });
}

/// Docstring style forwarded to the formatter.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Style {
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    #[serde(default = "default_param_type")]
    pub param_type: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            doc_type: default_doc_type(),
            param_type: default_param_type(),
        }
    }
}

fn default_doc_type() -> String {
    "normal".to_string()
}

fn default_param_type() -> String {
    "standard".to_string()
}

/// Where results go.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Output {
    #[serde(default)]
    pub mode: OutputMode,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Directory for `.patch` files; defaults to the current directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            prefix: default_prefix(),
            directory: None,
        }
    }
}

fn default_prefix() -> String {
    "pyment_".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Write `<basename>.patch`.
    #[default]
    Patch,
    /// Write the rewritten file as `<prefix><basename>` beside the original.
    Prefix,
    /// Overwrite the original file.
    InPlace,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Discovery {
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            recursive: default_recursive(),
            extensions: default_extensions(),
        }
    }
}

fn default_recursive() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingField {
        field: &'static str,
    },
    UnknownValue {
        field: &'static str,
        value: String,
        suggestion: Option<String>,
    },
    InvalidCombo {
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "missing required field '{field}'")
            }
            ValidationIssue::UnknownValue {
                field,
                value,
                suggestion,
            } => match suggestion {
                Some(s) => write!(f, "unknown {field} '{value}' (did you mean '{s}'?)"),
                None => write!(f, "unknown {field} '{value}'"),
            },
            ValidationIssue::InvalidCombo { message } => {
                write!(f, "invalid configuration: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_param_type_suggests() {
        let mut config = Config::default();
        config.style.param_type = "standart".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.issues,
            vec![ValidationIssue::UnknownValue {
                field: "style.param_type",
                value: "standart".to_string(),
                suggestion: Some("standard".to_string()),
            }]
        );
        assert!(err.to_string().contains("did you mean 'standard'?"));
    }

    #[test]
    fn test_far_values_get_no_suggestion() {
        let mut config = Config::default();
        config.style.doc_type = "javadoc-compact".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            &err.issues[0],
            ValidationIssue::UnknownValue { suggestion: None, .. }
        ));
    }

    #[test]
    fn test_prefix_mode_needs_prefix() {
        let mut config = Config::default();
        config.output.mode = OutputMode::Prefix;
        config.output.prefix = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let mut config = Config::default();
        config.discovery.extensions.clear();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.issues,
            vec![ValidationIssue::MissingField {
                field: "discovery.extensions"
            }]
        );
    }
}
