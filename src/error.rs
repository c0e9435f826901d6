use thiserror::Error;

pub type RosterResult<T> = Result<T, RosterError>;

/// Errors raised while loading a range source.
///
/// Parsing and serialization never fail; a malformed cell is simply skipped.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Unsupported input '{0}' (expected .yaml, .yml, .json, .xlsx, .xlsm, .xlsb, .xls or .ods)")]
    UnsupportedInput(String),

    #[error("Invalid Lua global name '{0}'")]
    InvalidGlobalName(String),

    #[error("Invalid named range document: {0}")]
    InvalidDocument(String),
}
