//! Validation orchestrator: a version gate, then cumulative levels 0-4.
//!
//! A thin driver that threads one [`Accumulator`] through each level's
//! checks in order and turns the result into a [`ValidationResult`].

pub mod content;
pub mod crossref;
pub mod structure;

use crate::ast::{Document, DocumentType};
use crate::config::{ValidationLevel, ValidationMode, ValidatorConfig};
use crate::enhance::{enhance, ValidationIssue};
use crate::error::SchemaInputError;
use crate::parser::parse_with;
use crate::schema::normalize::json_type_name;
use crate::schema::{read_json, ExtendedSchema, SchemaVersion};
use crate::violation::{Accumulator, FieldPath, Violation, ViolationKind};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// The typed model, present only when validation produced no errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedDocument {
    pub document: Document,
    /// Normalized extended schema; `None` below level 2 or when none was
    /// supplied.
    pub schema: Option<ExtendedSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub level: ValidationLevel,
    pub mode: ValidationMode,
    pub document_type: DocumentType,
    pub elapsed_ms: f64,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub model: Option<ValidatedDocument>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check `schema_version` before anything else. Any failure here is
/// unconditional.
pub fn check_schema_version(schema: &Value) -> Result<SchemaVersion, Violation> {
    let root = FieldPath::root();
    let path = root.key("schema_version");
    let Some(obj) = schema.as_object() else {
        return Err(Violation::new(
            root,
            ViolationKind::TypeMismatch {
                expected: "object",
                found: json_type_name(schema),
            },
        )
        .unconditional());
    };
    let raw = match obj.get("schema_version") {
        None | Some(Value::Null) => {
            return Err(Violation::new(path, ViolationKind::MissingRequired).unconditional())
        }
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(Violation::new(
                path,
                ViolationKind::TypeMismatch {
                    expected: "string",
                    found: json_type_name(other),
                },
            )
            .with_value(other.to_string())
            .unconditional())
        }
    };
    let Some(version) = SchemaVersion::parse(raw) else {
        return Err(Violation::new(
            path,
            ViolationKind::InvalidFormat {
                format: "semantic version (MAJOR.MINOR.PATCH)",
            },
        )
        .with_value(raw.as_str())
        .unconditional());
    };
    if !version.is_supported() {
        return Err(Violation::new(
            path,
            ViolationKind::UnsupportedVersion {
                supported: SchemaVersion::supported_description(),
            },
        )
        .with_value(raw.as_str()));
    }
    Ok(version)
}

/// Validate a parsed document and optional extended-schema JSON.
pub fn validate(doc: &Document, schema: Option<&Value>, config: &ValidatorConfig) -> ValidationResult {
    let started = Instant::now();
    let level = config.level;
    let mut acc = Accumulator::new(config.mode);
    debug!(%level, mode = %config.mode, document_type = %doc.document_type, "validating");

    // Gate: schema version
    let version = match schema.map(check_schema_version).transpose() {
        Ok(v) => v,
        Err(violation) => {
            warn!(field = %violation.path, kind = violation.kind.name(), "schema version gate failed");
            acc.record(violation);
            acc.halt();
            return finish(acc, doc, None, config, started);
        }
    };

    // Level 0: parse errors
    acc = structure::check_syntax(acc, doc);
    debug!(errors = acc.errors().len(), "level 0 done");

    // Level 1: required structure, parse warnings
    if level >= ValidationLevel::Structure && !acc.is_halted() {
        acc = structure::check_structure(acc, doc);
        acc = structure::carry_warnings(acc, doc);
        debug!(errors = acc.errors().len(), "level 1 done");
    }

    // Level 2: normalization and field constraints
    let mut normalized = None;
    if level >= ValidationLevel::Content && !acc.is_halted() {
        if let (Some(value), Some(version)) = (schema, version) {
            match ExtendedSchema::normalize(value, version) {
                Ok(n) => {
                    acc = content::check_content(acc, &n);
                    normalized = Some(n);
                }
                Err((path, err)) => acc.record(Violation::from_normalize(path, err)),
            }
        }
        debug!(errors = acc.errors().len(), "level 2 done");
    }

    // Level 3: concept graph and page references
    if level >= ValidationLevel::Quality && !acc.is_halted() {
        if let Some(n) = &normalized {
            acc = crossref::check_concepts(acc, &n.schema, &n.partial_concepts);
            acc = crossref::check_page_references(acc, &n.schema, doc);
        }
        debug!(errors = acc.errors().len(), "level 3 done");
    }

    // Level 4: extended schema completeness
    if level >= ValidationLevel::Extended && !acc.is_halted() {
        acc = content::check_extended(acc, normalized.as_ref().map(|n| &n.schema));
        debug!(errors = acc.errors().len(), "level 4 done");
    }

    finish(acc, doc, normalized.map(|n| n.schema), config, started)
}

/// Parse `text` with the configured limits, read the optional schema JSON
/// and validate both.
pub fn validate_source(
    text: &[u8],
    schema_json: Option<&str>,
    config: &ValidatorConfig,
) -> Result<ValidationResult, SchemaInputError> {
    let schema = schema_json.map(read_json).transpose()?;
    let doc = parse_with(text, &config.parse);
    Ok(validate(&doc, schema.as_ref(), config))
}

fn finish(
    acc: Accumulator,
    doc: &Document,
    schema: Option<ExtendedSchema>,
    config: &ValidatorConfig,
    started: Instant,
) -> ValidationResult {
    let (errors, warnings) = acc.into_parts();
    let model = errors.is_empty().then(|| ValidatedDocument {
        document: doc.clone(),
        schema,
    });
    let result = ValidationResult {
        valid: errors.is_empty(),
        level: config.level,
        mode: config.mode,
        document_type: doc.document_type,
        elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        errors: errors.iter().map(enhance).collect(),
        warnings: warnings.iter().map(enhance).collect(),
        model,
    };
    debug!(
        valid = result.valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        elapsed_ms = result.elapsed_ms,
        "validation finished"
    );
    result
}
