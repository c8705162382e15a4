//! Error types for the few operations that can fail outright.
//!
//! Parse and validation findings are never errors -- they are
//! [`Diagnostic`](crate::diagnostic::Diagnostic)s and
//! [`Violation`](crate::violation::Violation)s. These types cover input
//! that sits outside that contract (configuration files, schema files
//! that are not JSON) and the per-field normalization failures that the
//! schema layer converts into violations.

/// Failure to load a [`ValidatorConfig`](crate::config::ValidatorConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid validation level {0} (expected 0-4)")]
    InvalidLevel(u8),

    #[error("unknown validation mode '{0}' (expected fail-fast, collect-all or warn-only)")]
    InvalidMode(String),
}

/// Failure to read extended-schema input into a JSON tree.
#[derive(Debug, thiserror::Error)]
pub enum SchemaInputError {
    #[error("schema input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// A raw value that could not be converted into its canonical typed form.
///
/// Produced by the normalization stage only; constraint checks never
/// see values that failed here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("missing required field '{field}'")]
    Missing { field: String },

    #[error("field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
        input: String,
    },

    #[error("field '{field}' is not a valid date: '{input}'")]
    InvalidDate { field: String, input: String },

    #[error("field '{field}' has unknown value '{input}'")]
    UnknownVariant {
        field: String,
        input: String,
        allowed: &'static [&'static str],
    },

    #[error("field '{field}' is not a valid identifier: '{input}'")]
    InvalidIdentifier { field: String, input: String },
}

impl NormalizeError {
    pub fn field(&self) -> &str {
        match self {
            NormalizeError::Missing { field }
            | NormalizeError::TypeMismatch { field, .. }
            | NormalizeError::InvalidDate { field, .. }
            | NormalizeError::UnknownVariant { field, .. }
            | NormalizeError::InvalidIdentifier { field, .. } => field,
        }
    }
}
