//! Raw validation findings and the accumulator that collects them.
//!
//! Each validation step takes an [`Accumulator`] by value, records what it
//! finds and hands the accumulator back. The accumulator applies the
//! propagation mode: fail-fast stops recording after the first error,
//! warn-only downgrades everything except unconditional violations.

use crate::config::ValidationMode;
use crate::constants::ROOT_PATH;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use crate::error::NormalizeError;
use serde::{Serialize, Serializer};
use std::fmt;

// ──────────────────────────────────────────────
// Field paths
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the extended schema, e.g.
/// `concepts[1].depends_on[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        FieldPath::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.to_string()));
        FieldPath { segments }
    }

    pub fn index(&self, i: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(i));
        FieldPath { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The innermost array index, e.g. `2` for `concepts[2]`.
    pub fn last_index(&self) -> Option<usize> {
        self.segments.iter().rev().find_map(|seg| match seg {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(ROOT_PATH);
        }
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Key(k) if i == 0 => f.write_str(k)?,
                PathSegment::Key(k) => write!(f, ".{}", k)?,
                PathSegment::Index(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ──────────────────────────────────────────────
// Violations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    TooShort {
        min: usize,
        actual: usize,
    },
    TooLong {
        max: usize,
        actual: usize,
    },
    InvalidFormat {
        format: &'static str,
    },
    EnumMismatch {
        allowed: &'static [&'static str],
    },
    PatternMismatch {
        pattern: &'static str,
    },
    MissingRequired,
    SelfReference {
        concept: String,
    },
    UnresolvedReference {
        source: String,
        target: String,
    },
    DuplicateId {
        id: String,
        first_index: usize,
    },
    UnsupportedVersion {
        supported: String,
    },
    UnknownPage,
    /// A parse diagnostic surfaced by the orchestrator.
    Diagnostic {
        code: DiagnosticCode,
        message: String,
    },
}

impl ViolationKind {
    pub fn name(&self) -> &'static str {
        match self {
            ViolationKind::TypeMismatch { .. } => "type_mismatch",
            ViolationKind::TooShort { .. } => "too_short",
            ViolationKind::TooLong { .. } => "too_long",
            ViolationKind::InvalidFormat { .. } => "invalid_format",
            ViolationKind::EnumMismatch { .. } => "enum_mismatch",
            ViolationKind::PatternMismatch { .. } => "pattern_mismatch",
            ViolationKind::MissingRequired => "missing_required",
            ViolationKind::SelfReference { .. } => "self_reference",
            ViolationKind::UnresolvedReference { .. } => "unresolved_reference",
            ViolationKind::DuplicateId { .. } => "duplicate_id",
            ViolationKind::UnsupportedVersion { .. } => "unsupported_version",
            ViolationKind::UnknownPage => "unknown_page",
            ViolationKind::Diagnostic { .. } => "diagnostic",
        }
    }

    /// Kinds that stay errors in every mode.
    pub fn is_unconditional(&self) -> bool {
        matches!(
            self,
            ViolationKind::SelfReference { .. }
                | ViolationKind::UnresolvedReference { .. }
                | ViolationKind::DuplicateId { .. }
                | ViolationKind::UnsupportedVersion { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: FieldPath,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub severity: Severity,
    pub line: Option<u32>,
    /// Offending value, rendered as text.
    pub value: Option<String>,
    pub unconditional: bool,
}

impl Violation {
    pub fn new(path: FieldPath, kind: ViolationKind) -> Self {
        Violation {
            path,
            unconditional: kind.is_unconditional(),
            kind,
            severity: Severity::Error,
            line: None,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Mark as surviving every mode (used by the version gate).
    pub fn unconditional(mut self) -> Self {
        self.unconditional = true;
        self
    }

    pub fn from_diagnostic(d: &Diagnostic) -> Self {
        Violation {
            path: FieldPath::root(),
            kind: ViolationKind::Diagnostic {
                code: d.code,
                message: d.message.clone(),
            },
            severity: d.severity,
            line: Some(d.line),
            value: None,
            unconditional: false,
        }
    }

    pub fn from_normalize(path: FieldPath, err: NormalizeError) -> Self {
        match err {
            NormalizeError::Missing { .. } => Violation::new(path, ViolationKind::MissingRequired),
            NormalizeError::TypeMismatch {
                expected,
                found,
                input,
                ..
            } => Violation::new(path, ViolationKind::TypeMismatch { expected, found })
                .with_value(input),
            NormalizeError::InvalidDate { input, .. } => Violation::new(
                path,
                ViolationKind::InvalidFormat {
                    format: "date (YYYY-MM-DD)",
                },
            )
            .with_value(input),
            NormalizeError::UnknownVariant { input, allowed, .. } => {
                Violation::new(path, ViolationKind::EnumMismatch { allowed }).with_value(input)
            }
            NormalizeError::InvalidIdentifier { input, .. } => Violation::new(
                path,
                ViolationKind::PatternMismatch {
                    pattern: crate::constants::CONCEPT_ID_PATTERN,
                },
            )
            .with_value(input),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ──────────────────────────────────────────────
// Accumulator
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Accumulator {
    mode: ValidationMode,
    errors: Vec<Violation>,
    warnings: Vec<Violation>,
    halted: bool,
}

impl Accumulator {
    pub fn new(mode: ValidationMode) -> Self {
        Accumulator {
            mode,
            errors: Vec::new(),
            warnings: Vec::new(),
            halted: false,
        }
    }

    pub fn record(&mut self, mut v: Violation) {
        if self.halted {
            return;
        }
        if v.is_error() && !v.unconditional && self.mode == ValidationMode::WarnOnly {
            v.severity = Severity::Warning;
        }
        if v.is_error() {
            self.errors.push(v);
            if self.mode == ValidationMode::FailFast {
                self.halted = true;
            }
        } else {
            self.warnings.push(v);
        }
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        for v in violations {
            self.record(v);
        }
    }

    /// Stop recording regardless of mode.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Violation] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<Violation>, Vec<Violation>) {
        (self.errors, self.warnings)
    }
}
