use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaepError {
    #[error("Unusable schema: {0}")]
    Schema(String),

    #[error("Unsupported field '{field}': {reason}")]
    Field { field: String, reason: String },

    #[error("{0}")]
    Validation(ValidationError),

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<CaepError>),

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Section [{section}] not found in {path}")]
    MissingSection { section: String, path: PathBuf },

    #[error("Failed to parse {path} (line {line}): {reason}")]
    IniSyntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("Config id is required, call .config_id() on the builder")]
    ConfigIdRequired,
}

/// A single field that failed resolution or type checks.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Field key as declared (or its alias when aliases are in use).
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The command-line flag this issue refers to, e.g. `--str-arg`.
    pub fn flag(&self) -> String {
        format!("--{}", self.field.replace('_', "-"))
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.message, self.flag())
    }
}

/// Every field that failed to resolve into a valid value, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.issues.len();
        write!(
            f,
            "{count} validation error{}",
            if count == 1 { "" } else { "s" }
        )?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for CaepError {
    fn from(err: ValidationError) -> Self {
        CaepError::Validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_not_found_formats() {
        let err = CaepError::KeyNotFound("str_arg".into());
        assert_eq!(err.to_string(), "Key not found: str_arg");
    }

    #[test]
    fn unknown_key_formats_correctly() {
        let err = CaepError::UnknownKey {
            key: "typo_key".into(),
            path: "/home/user/.config/myapp/myapp.ini".into(),
            line: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("typo_key"));
        assert!(msg.contains("myapp.ini"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn issue_names_dash_cased_flag() {
        let issue = FieldIssue::new("str_arg", "field required");
        assert_eq!(issue.to_string(), "field required for --str-arg");
    }

    #[test]
    fn validation_error_lists_every_issue() {
        let err = ValidationError {
            issues: vec![
                FieldIssue::new("str_arg", "field required"),
                FieldIssue::new("number", "value is not a valid integer"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 validation errors"));
        assert!(msg.contains("--str-arg"));
        assert!(msg.contains("--number"));
    }

    #[test]
    fn config_not_found_names_path() {
        let err = CaepError::ConfigNotFound {
            path: "/nope/app.ini".into(),
        };
        assert!(err.to_string().contains("/nope/app.ini"));
    }

    #[test]
    fn config_id_required_formats() {
        let err = CaepError::ConfigIdRequired;
        assert!(err.to_string().contains("config_id"));
    }
}
