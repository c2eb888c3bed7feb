//! Locating and reading `pydoc-patcher.toml`.

use crate::config::schema::{Config, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the working directory when no config is given.
pub const CONFIG_FILE_NAME: &str = "pydoc-patcher.toml";

/// Where a configuration came from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Text handed to [`load_from_str`].
    Inline,
    /// A file named with `--config`.
    Explicit(PathBuf),
    /// `pydoc-patcher.toml` picked up from the working directory.
    Discovered(PathBuf),
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::Inline => f.write_str("inline config"),
            ConfigOrigin::Explicit(path) => write!(f, "--config {}", path.display()),
            ConfigOrigin::Discovered(path) => write!(f, "{} (found in working directory)", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {origin}: {source}")]
    Read {
        origin: ConfigOrigin,
        source: std::io::Error,
    },

    #[error("{origin} is not valid TOML for pydoc-patcher: {source}")]
    Parse {
        origin: ConfigOrigin,
        source: toml_edit::de::Error,
    },

    #[error("{origin} has invalid settings:\n{source}")]
    Invalid {
        origin: ConfigOrigin,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn origin(&self) -> &ConfigOrigin {
        match self {
            ConfigError::Read { origin, .. }
            | ConfigError::Parse { origin, .. }
            | ConfigError::Invalid { origin, .. } => origin,
        }
    }
}

/// Parse and validate config text.
pub fn load_from_str(input: &str) -> Result<Config, ConfigError> {
    parse(input, ConfigOrigin::Inline)
}

/// Read the file named on the command line.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    read(path, ConfigOrigin::Explicit(path.to_path_buf()))
}

/// Load an explicit config, or `pydoc-patcher.toml` from `dir` if present,
/// or fall back to defaults.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        debug!(path = %candidate.display(), "using discovered config");
        return read(&candidate, ConfigOrigin::Discovered(candidate.clone()));
    }
    Ok(Config::default())
}

fn read(path: &Path, origin: ConfigOrigin) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse(&contents, origin),
        Err(source) => Err(ConfigError::Read { origin, source }),
    }
}

fn parse(input: &str, origin: ConfigOrigin) -> Result<Config, ConfigError> {
    let config: Config = match toml_edit::de::from_str(input) {
        Ok(config) => config,
        Err(source) => return Err(ConfigError::Parse { origin, source }),
    };
    match config.validate() {
        Ok(()) => Ok(config),
        Err(source) => Err(ConfigError::Invalid { origin, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OutputMode;

    #[test]
    fn test_load_full_config() {
        let config = load_from_str(
            r#"
[style]
doc_type = "normal"
param_type = "restructuredtext"

[output]
mode = "prefix"
prefix = "new_"

[discovery]
recursive = false
extensions = ["py", "pyw"]
"#,
        )
        .unwrap();
        assert_eq!(config.style.param_type, "restructuredtext");
        assert_eq!(config.output.mode, OutputMode::Prefix);
        assert_eq!(config.output.prefix, "new_");
        assert!(!config.discovery.recursive);
        assert_eq!(config.discovery.extensions, vec!["py", "pyw"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(load_from_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_in_place_mode_name() {
        let config = load_from_str("[output]\nmode = \"in-place\"\n").unwrap();
        assert_eq!(config.output.mode, OutputMode::InPlace);
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = load_from_str("[style]\nflavour = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { origin: ConfigOrigin::Inline, .. }));
        assert!(err.to_string().starts_with("inline config is not valid TOML"));
    }

    #[test]
    fn test_invalid_explicit_file_names_config_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        fs::write(&path, "[style]\nparam_type = \"numpy\"\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.origin(), &ConfigOrigin::Explicit(path.clone()));
        let message = err.to_string();
        assert!(message.starts_with("--config "));
        assert!(message.contains("unknown style.param_type 'numpy'"));
    }

    #[test]
    fn test_invalid_discovered_file_says_where_it_was_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[output]\nmode = \"sideways\"\n").unwrap();
        let err = load_or_default(None, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.origin(), &ConfigOrigin::Discovered(path));
        assert!(err.to_string().contains("found in working directory"));
    }

    #[test]
    fn test_load_or_default_discovers_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_or_default(None, dir.path()).unwrap(), Config::default());

        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[output]\nmode = \"in-place\"\n",
        )
        .unwrap();
        let config = load_or_default(None, dir.path()).unwrap();
        assert_eq!(config.output.mode, OutputMode::InPlace);
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let err = load_or_default(Some(Path::new("/nonexistent/cfg.toml")), Path::new(".")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Read { origin: ConfigOrigin::Explicit(_), .. }
        ));
    }
}
