//! Raw violations -> human-readable, field-contextualized issues.

use crate::diagnostic::{DiagnosticCode, Severity};
use crate::violation::{Violation, ViolationKind};
use serde::Serialize;

/// One reported finding in a [`ValidationResult`](crate::ValidationResult).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Snake-case violation kind, e.g. `unresolved_reference`.
    pub kind: &'static str,
    /// Dotted field path, or `<root>`.
    pub field: String,
    pub line: Option<u32>,
    pub code: Option<DiagnosticCode>,
    pub value: Option<String>,
    pub message: String,
    #[serde(skip)]
    pub violation: Violation,
}

pub fn enhance(v: &Violation) -> ValidationIssue {
    let code = match &v.kind {
        ViolationKind::Diagnostic { code, .. } => Some(*code),
        _ => None,
    };
    ValidationIssue {
        severity: v.severity,
        kind: v.kind.name(),
        field: v.path.to_string(),
        line: v.line,
        code,
        value: v.value.clone(),
        message: message(v),
        violation: v.clone(),
    }
}

fn message(v: &Violation) -> String {
    let field = v.path.to_string();
    let body = match &v.kind {
        ViolationKind::TypeMismatch { expected, found } => {
            format!("expected {}, found {}", expected, found)
        }
        ViolationKind::TooShort { min, actual } => format!(
            "must be at least {} characters long (got {})",
            min, actual
        ),
        ViolationKind::TooLong { max, actual } => format!(
            "must be at most {} characters long (got {})",
            max, actual
        ),
        ViolationKind::InvalidFormat { format } => format!("is not a valid {}", format),
        ViolationKind::EnumMismatch { allowed } => {
            format!("must be one of: {}", allowed.join(", "))
        }
        ViolationKind::PatternMismatch { pattern } => {
            format!("does not match pattern {}", pattern)
        }
        ViolationKind::MissingRequired => "is required but missing".to_string(),
        ViolationKind::SelfReference { concept } => {
            format!("concept '{}' depends on itself", concept)
        }
        ViolationKind::UnresolvedReference { source, target } => format!(
            "concept '{}' depends on '{}', which is not defined in this document",
            source, target
        ),
        ViolationKind::DuplicateId { id, first_index } => format!(
            "concept id '{}' is already defined at concepts[{}]",
            id, first_index
        ),
        ViolationKind::UnsupportedVersion { supported } => {
            format!("schema version is not supported (supported: {})", supported)
        }
        ViolationKind::UnknownPage => {
            "matches no declared page and no entry in the document".to_string()
        }
        ViolationKind::Diagnostic { code, message } => {
            let line = v.line.unwrap_or(0);
            return match &v.value {
                Some(value) => format!("line {}: [{}] {} ({})", line, code, message, value),
                None => format!("line {}: [{}] {}", line, code, message),
            };
        }
    };
    match &v.value {
        Some(value) => format!("{}: {} (value: '{}')", field, body, value),
        None => format!("{}: {}", field, body),
    }
}
