//! Orchestrator behaviour across levels and propagation modes.

use llmstxt_core::{
    parse, parse_str, read_json, validate, validate_source, ValidationLevel, ValidationMode,
    ValidatorConfig,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(workspace_root().join("fixtures").join(name)).unwrap()
}

fn config(level: u8, mode: ValidationMode) -> ValidatorConfig {
    ValidatorConfig::new(ValidationLevel::try_from(level).unwrap(), mode)
}

const DEMO_DOC: &str = "# Demo\n> desc\n## Docs\n- [Title](https://x.com): note\n";

fn concept(id: &str, deps: &[&str]) -> Value {
    json!({
        "id": id,
        "name": id,
        "definition": "A definition that is long enough.",
        "depends_on": deps
    })
}

fn schema_with(concepts: Value) -> Value {
    json!({ "schema_version": "0.1.0", "concepts": concepts })
}

// ──────────────────────────────────────────────
// 1. Referential examples
// ──────────────────────────────────────────────

#[test]
fn self_dependency_fails_with_named_concept() {
    let doc = parse_str(DEMO_DOC);
    let schema = schema_with(json!([concept("a", &["a"])]));
    let result = validate(&doc, Some(&schema), &config(3, ValidationMode::CollectAll));
    assert!(!result.is_valid());
    let issue = result
        .errors
        .iter()
        .find(|i| i.kind == "self_reference")
        .expect("self_reference issue");
    assert!(issue.message.contains("'a'"));
    assert_eq!(issue.field, "concepts[0].depends_on[0]");
}

#[test]
fn unresolved_dependency_names_source_and_target() {
    let doc = parse_str(DEMO_DOC);
    let schema = schema_with(json!([concept("bbb", &["ccc"])]));
    let result = validate(&doc, Some(&schema), &config(3, ValidationMode::CollectAll));
    assert_eq!(result.errors.len(), 1);
    let issue = &result.errors[0];
    assert_eq!(issue.kind, "unresolved_reference");
    assert!(issue.message.contains("'bbb'"));
    assert!(issue.message.contains("'ccc'"));
}

#[test]
fn referential_checks_wait_for_level_three() {
    let doc = parse_str(DEMO_DOC);
    let schema = schema_with(json!([concept("bbb", &["ccc"])]));
    let result = validate(&doc, Some(&schema), &config(2, ValidationMode::CollectAll));
    assert!(result.is_valid());
}

#[test]
fn referential_violations_survive_warn_only() {
    let doc = parse_str(DEMO_DOC);
    let schema = schema_with(json!([concept("x", &["x"]), concept("bbb", &["ccc"])]));
    let result = validate(&doc, Some(&schema), &config(3, ValidationMode::WarnOnly));
    let kinds: Vec<&str> = result.errors.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec!["self_reference", "unresolved_reference"]);
    assert!(result.warnings.iter().any(|w| w.kind == "pattern_mismatch"));
}

#[test]
fn concepts_with_bad_fields_still_have_their_references_checked() {
    let doc = parse_str(DEMO_DOC);
    let mut unresolved = concept("bbb", &["ccc"]);
    unresolved["name"] = json!(5);
    let mut looped = concept("aaa", &["aaa"]);
    looped["name"] = json!(7);
    let schema = schema_with(json!([unresolved, looped]));

    let result = validate(&doc, Some(&schema), &config(3, ValidationMode::WarnOnly));
    assert!(!result.is_valid());
    let kinds: Vec<&str> = result.errors.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec!["unresolved_reference", "self_reference"]);
    assert!(result.errors[0].message.contains("'bbb'"));
    assert!(result.errors[0].message.contains("'ccc'"));
    assert!(result.errors[1].message.contains("'aaa'"));
    assert!(result.warnings.iter().any(|w| w.kind == "type_mismatch"));
    assert!(result.model.is_none());

    let result = validate(&doc, Some(&schema), &config(3, ValidationMode::CollectAll));
    let kinds: Vec<&str> = result.errors.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            "type_mismatch",
            "type_mismatch",
            "unresolved_reference",
            "self_reference"
        ]
    );
}

#[test]
fn duplicate_id_on_a_concept_with_bad_fields_fails_in_warn_only() {
    let doc = parse_str(DEMO_DOC);
    let mut copy = concept("auth", &[]);
    copy["name"] = json!(false);
    let schema = schema_with(json!([concept("auth", &[]), copy]));
    let result = validate(&doc, Some(&schema), &config(3, ValidationMode::WarnOnly));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, "duplicate_id");
    assert_eq!(result.errors[0].field, "concepts[1].id");
}

#[test]
fn validated_model_has_consistent_concept_graph() {
    let doc = parse(fixture_text("demo.llms.txt").as_bytes());
    let schema = read_json(&fixture_text("demo.schema.json")).unwrap();
    let result = validate(&doc, Some(&schema), &config(4, ValidationMode::CollectAll));
    assert!(result.is_valid(), "{:#?}", result.errors);
    assert!(result.warnings.is_empty(), "{:#?}", result.warnings);

    let model = result.model.expect("model");
    let schema = model.schema.expect("normalized schema");
    let ids: Vec<&str> = schema.concepts.iter().map(|c| c.id.as_str()).collect();
    for c in &schema.concepts {
        assert!(!c.depends_on.contains(&c.id));
        for dep in &c.depends_on {
            assert!(ids.contains(&dep.as_str()));
        }
    }
}

// ──────────────────────────────────────────────
// 2. Modes
// ──────────────────────────────────────────────

#[test]
fn collect_all_starts_with_the_fail_fast_violation() {
    let text = fixture_text("broken.llms.txt");
    let schema = fixture_text("broken.schema.json");
    for level in 0..=4 {
        let all = validate_source(
            text.as_bytes(),
            Some(&schema),
            &config(level, ValidationMode::CollectAll),
        )
        .unwrap();
        let first = validate_source(
            text.as_bytes(),
            Some(&schema),
            &config(level, ValidationMode::FailFast),
        )
        .unwrap();
        assert!(!all.errors.is_empty());
        assert_eq!(first.errors.len(), 1);
        assert_eq!(all.errors[0], first.errors[0]);
    }
}

#[test]
fn warn_only_never_fails_on_conditional_violations() {
    let text = fixture_text("broken.llms.txt");
    let result =
        validate_source(text.as_bytes(), None, &config(4, ValidationMode::WarnOnly)).unwrap();
    assert!(result.is_valid());
    assert!(result.model.is_some());
    assert!(result
        .warnings
        .iter()
        .all(|w| w.severity == llmstxt_core::Severity::Warning));
    let codes: Vec<&str> = result
        .warnings
        .iter()
        .filter_map(|w| w.code.map(|c| c.as_str()))
        .collect();
    assert!(codes.contains(&"E004"));
    assert!(codes.contains(&"W002"));
}

// ──────────────────────────────────────────────
// 3. Levels
// ──────────────────────────────────────────────

#[test]
fn level_zero_ignores_warnings() {
    let doc = parse_str("# T\n## S\n- [a](/relative)\n");
    let result = validate(&doc, None, &config(0, ValidationMode::CollectAll));
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());

    let result = validate(&doc, None, &config(1, ValidationMode::CollectAll));
    let codes: Vec<&str> = result
        .warnings
        .iter()
        .filter_map(|w| w.code.map(|c| c.as_str()))
        .collect();
    assert_eq!(codes, vec!["W001", "W005"]);
}

#[test]
fn full_documents_skip_catalog_grammar() {
    let text = fixture_text("full.llms.txt");
    let result =
        validate_source(text.as_bytes(), None, &config(2, ValidationMode::CollectAll)).unwrap();
    assert!(result.is_valid(), "{:#?}", result.errors);
    assert_eq!(result.document_type, llmstxt_core::DocumentType::Full);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.code == Some(llmstxt_core::DiagnosticCode::W011FullDocument)));
}

#[test]
fn content_level_reports_field_constraints() {
    let doc = parse_str(DEMO_DOC);
    let schema = json!({
        "schema_version": "0.1.0",
        "pages": [{
            "url": "ftp://files.example.com/a",
            "title": "",
            "content_type": "podcast",
            "last_verified": "2024-13-01",
            "summary": "tiny"
        }],
        "concepts": [{
            "id": "Auth",
            "name": "Auth",
            "definition": "short"
        }]
    });
    let result = validate(&doc, Some(&schema), &config(2, ValidationMode::CollectAll));
    let found: Vec<(String, &str)> = result
        .errors
        .iter()
        .map(|i| (i.field.clone(), i.kind))
        .collect();
    assert_eq!(
        found,
        vec![
            ("pages[0].content_type".to_string(), "enum_mismatch"),
            ("pages[0].last_verified".to_string(), "invalid_format"),
            ("concepts[0].id".to_string(), "pattern_mismatch"),
        ]
    );
    assert!(result.errors[0].message.contains("podcast"));
}

#[test]
fn extended_level_requires_schema_lists() {
    let doc = parse_str(DEMO_DOC);
    let result = validate(&doc, None, &config(4, ValidationMode::CollectAll));
    let fields: Vec<&str> = result.errors.iter().map(|i| i.field.as_str()).collect();
    assert_eq!(fields, vec!["pages", "concepts", "few_shot_examples"]);
}

#[test]
fn unsupported_schema_version_is_unconditional() {
    let doc = parse_str(DEMO_DOC);
    let schema = read_json(&fixture_text("unsupported.schema.json")).unwrap();
    for mode in [
        ValidationMode::FailFast,
        ValidationMode::CollectAll,
        ValidationMode::WarnOnly,
    ] {
        let result = validate(&doc, Some(&schema), &config(0, mode));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, "unsupported_version");
        assert_eq!(result.errors[0].value.as_deref(), Some("2.0.0"));
        assert!(result.errors[0].message.contains("0.1.x"));
    }
}
