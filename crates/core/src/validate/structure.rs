//! Levels 0 and 1: parse diagnostics and required document structure.

use crate::ast::{Document, DocumentType};
use crate::diagnostic::{DiagnosticCode, Severity};
use crate::violation::{Accumulator, FieldPath, Violation, ViolationKind};

/// Codes that only apply to the link-catalog grammar.
const INDEX_ONLY: &[DiagnosticCode] = &[
    DiagnosticCode::E003NoSections,
    DiagnosticCode::E005MalformedEntry,
    DiagnosticCode::E008BareUrl,
];

fn applies(doc: &Document, code: DiagnosticCode) -> bool {
    doc.document_type.enforces_link_grammar() || !INDEX_ONLY.contains(&code)
}

/// Level 0: every ERROR-severity parse diagnostic.
pub fn check_syntax(mut acc: Accumulator, doc: &Document) -> Accumulator {
    for d in doc.errors().filter(|d| applies(doc, d.code)) {
        acc.record(Violation::from_diagnostic(d));
    }
    acc
}

/// Level 1: title and at least one section (Index documents only).
pub fn check_structure(mut acc: Accumulator, doc: &Document) -> Accumulator {
    let root = FieldPath::root();
    if doc.title.is_none() {
        acc.record(Violation::new(root.key("title"), ViolationKind::MissingRequired));
    }
    if doc.sections.is_empty() && doc.document_type == DocumentType::Index {
        acc.record(Violation::new(
            root.key("sections"),
            ViolationKind::MissingRequired,
        ));
    }
    acc
}

/// Level 1 and up: WARNING-severity parse diagnostics become warnings.
pub fn carry_warnings(mut acc: Accumulator, doc: &Document) -> Accumulator {
    for d in doc.diagnostics.iter() {
        if d.severity == Severity::Warning {
            acc.record(Violation::from_diagnostic(d));
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationMode;
    use crate::parser::parse_str;

    #[test]
    fn full_documents_skip_catalog_grammar() {
        let doc = parse_str("# A\n> d\n# B\nhttps://x.io\n");
        assert_eq!(doc.document_type, DocumentType::Full);
        assert!(doc.has_code(DiagnosticCode::E003NoSections));

        let acc = check_syntax(Accumulator::new(ValidationMode::CollectAll), &doc);
        let acc = check_structure(acc, &doc);
        assert!(!acc.has_errors());
    }

    #[test]
    fn index_document_without_sections_fails_both_levels() {
        let doc = parse_str("# A\n> d\n");
        let acc = check_syntax(Accumulator::new(ValidationMode::CollectAll), &doc);
        let acc = check_structure(acc, &doc);
        let names: Vec<String> = acc.errors().iter().map(|v| v.path.to_string()).collect();
        assert_eq!(names, vec!["<root>", "sections"]);
    }

    #[test]
    fn info_diagnostics_are_dropped() {
        let doc = parse_str("# A\n> d\n## S\n### sub\n- [a]()\n");
        let acc = carry_warnings(Accumulator::new(ValidationMode::CollectAll), &doc);
        assert_eq!(acc.warnings().len(), 1);
        assert!(matches!(
            acc.warnings()[0].kind,
            ViolationKind::Diagnostic {
                code: DiagnosticCode::W004EmptyUrl,
                ..
            }
        ));
    }
}
