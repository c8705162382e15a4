//! Document tree produced by the structural parser.
//!
//! Every node carries the 1-based source line it was read from. The tree
//! owns all of its children; nothing here references another document.

use crate::constants::CanonicalSection;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

// ──────────────────────────────────────────────
// Document
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// First H1. `None` only when recovery could not find one.
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub sections: Vec<Section>,
    /// Ordered by line, then discovery order.
    pub diagnostics: Vec<Diagnostic>,
    pub document_type: DocumentType,
    pub stats: DocumentStats,
}

impl Document {
    /// True iff no ERROR-severity diagnostic was recorded.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Counters gathered while parsing; the classifier reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub line_count: usize,
    pub byte_count: usize,
    /// H1 lines outside fenced code, including the title.
    pub h1_count: usize,
}

/// Index documents curate links; Full documents inline their content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Index,
    Full,
}

impl DocumentType {
    /// Whether the link-catalog grammar (sections, entries) is enforced.
    pub fn enforces_link_grammar(self) -> bool {
        self == DocumentType::Index
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Index => f.write_str("Index"),
            DocumentType::Full => f.write_str("Full"),
        }
    }
}

// ──────────────────────────────────────────────
// Sections and entries
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Exact case-insensitive match to "Optional". A consumption hint only.
    pub is_optional: bool,
    pub entries: Vec<FileEntry>,
    pub prose: Vec<String>,
    pub line: u32,
}

impl Section {
    pub fn new(name: &str, line: u32) -> Self {
        let name = name.trim().to_string();
        Section {
            is_optional: name.eq_ignore_ascii_case("optional"),
            name,
            entries: Vec::new(),
            prose: Vec::new(),
            line,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.prose.is_empty()
    }

    /// Canonical section this name (or a known alias) refers to.
    pub fn canonical_name(&self) -> Option<CanonicalSection> {
        CanonicalSection::resolve(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub title: String,
    /// May be empty; flagged with W004 rather than rejected.
    pub url: String,
    pub notes: Option<String>,
    pub line: u32,
}
