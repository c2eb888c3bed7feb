pub mod loader;
pub mod schema;

pub use loader::{
    load_from_path, load_from_str, load_or_default, ConfigError, ConfigOrigin, CONFIG_FILE_NAME,
};
pub use schema::{
    Config, Discovery, Output, OutputMode, Style, ValidationError, ValidationIssue,
};
