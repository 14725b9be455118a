//! Error taxonomy (spec §7): malformed schema, invalid instance, I/O
//! failure, cancelled. Each engine operation stops at the first error and
//! propagates it unchanged; the generator's own validity labelling folds
//! `apply` errors into instance metadata rather than surfacing them here.

use thiserror::Error;

/// Produced by `validate_schema` when a keyword violates its own
/// validation contract (wrong kind, out of range, non-unique entries,
/// missing a co-required sibling keyword).
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("keyword `{keyword}` ({section}): {message}")]
    MalformedSchema {
        keyword: &'static str,
        section: &'static str,
        message: String,
    },
    #[error("invalid JSON: {0}")]
    Parse(String),
    #[error("schema root must be a JSON object")]
    RootNotObject,
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}

impl SchemaError {
    pub fn malformed(keyword: &'static str, section: &'static str, message: impl Into<String>) -> Self {
        SchemaError::MalformedSchema {
            keyword,
            section,
            message: message.into(),
        }
    }
}

/// Produced by `apply_schema` when an instance does not satisfy a
/// keyword. Carries enough context (the keyword, a draft-04 section
/// reference, and a JSON-pointer-ish path) to locate the failure.
#[derive(Error, Debug, Clone)]
pub enum InstanceError {
    #[error("at {path}: keyword `{keyword}` ({section}): {message}")]
    Invalid {
        keyword: &'static str,
        section: &'static str,
        message: String,
        path: String,
    },
}

impl InstanceError {
    pub fn invalid(
        keyword: &'static str,
        section: &'static str,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        InstanceError::Invalid {
            keyword,
            section,
            message: message.into(),
            path: path.into(),
        }
    }
}

/// Wraps the two engine error kinds plus the loader's own concerns
/// (I/O, cooperative cancellation).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("load cancelled")]
    Cancelled,
}
