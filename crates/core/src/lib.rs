//! llmstxt-core: structural parser and multi-level validator for llms.txt.
//!
//! Raw bytes go through the line classifier ([`lexer`]) and the phase
//! state machine ([`parser`]) into a [`Document`] with line-numbered
//! [`Diagnostic`]s, then through the [`classify`] heuristic. [`validate()`]
//! checks the document and an optional extended schema at levels 0-4 in
//! one of three propagation modes.
//!
//! # Public API
//!
//! - [`parse()`], [`parse_str()`], [`parse_with()`] -- bytes/text to [`Document`]
//! - [`validate()`], [`validate_source()`] -- [`ValidationResult`]
//! - [`render()`] -- canonical llms.txt text
//! - [`ValidatorConfig`] -- level, mode and parse limits (TOML-loadable)
//!
//! No function in this crate performs I/O.

pub mod ast;
pub mod classify;
pub mod config;
pub mod constants;
pub mod diagnostic;
pub mod enhance;
pub mod error;
pub mod lexer;
pub mod links;
pub mod parser;
pub mod render;
pub mod schema;
pub mod validate;
pub mod violation;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Document, DocumentType, FileEntry, Section};
pub use config::{ParseOptions, ValidationLevel, ValidationMode, ValidatorConfig};
pub use constants::CanonicalSection;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use enhance::ValidationIssue;
pub use error::{ConfigError, NormalizeError, SchemaInputError};
pub use schema::{Concept, ContentType, ExtendedSchema, FewShotExample, Page, SchemaVersion};
pub use validate::{ValidatedDocument, ValidationResult};
pub use violation::{FieldPath, Violation, ViolationKind};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use parser::{parse, parse_str, parse_with};
pub use render::render;
pub use schema::read_json;
pub use validate::{validate, validate_source};
