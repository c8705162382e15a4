//! Levels 2 and 4: field constraints and extended-schema completeness.

use crate::schema::{ExtendedSchema, Normalized};
use crate::violation::{Accumulator, FieldPath, Violation, ViolationKind};
use tracing::trace;

/// Level 2: normalization failures first, then the constraint stage over
/// everything that normalized.
pub fn check_content(mut acc: Accumulator, normalized: &Normalized) -> Accumulator {
    for (path, err) in &normalized.failures {
        trace!(field = err.field(), %err, "normalization failure");
        acc.record(Violation::from_normalize(path.clone(), err.clone()));
    }
    acc.extend(normalized.schema.check());
    acc
}

/// Level 4: pages, concepts and few-shot examples must all be present.
pub fn check_extended(mut acc: Accumulator, schema: Option<&ExtendedSchema>) -> Accumulator {
    let root = FieldPath::root();
    let required = [
        ("pages", schema.map_or(0, |s| s.pages.len())),
        ("concepts", schema.map_or(0, |s| s.concepts.len())),
        (
            "few_shot_examples",
            schema.map_or(0, |s| s.few_shot_examples.len()),
        ),
    ];
    for (key, count) in required {
        if count == 0 {
            acc.record(Violation::new(root.key(key), ViolationKind::MissingRequired));
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationMode;
    use crate::schema::SchemaVersion;
    use serde_json::json;

    #[test]
    fn normalization_failures_precede_constraint_violations() {
        let v = json!({
            "schema_version": "0.1.0",
            "site_name": "",
            "pages": [{ "url": "https://a.io", "title": "A", "content_type": "faq",
                        "last_verified": "someday", "summary": "Long enough summary." }]
        });
        let n = ExtendedSchema::normalize(&v, SchemaVersion::parse("0.1.0").unwrap()).unwrap();
        let acc = check_content(Accumulator::new(ValidationMode::CollectAll), &n);
        let kinds: Vec<&str> = acc.errors().iter().map(|v| v.kind.name()).collect();
        assert_eq!(kinds, vec!["invalid_format", "too_short"]);
        assert_eq!(acc.errors()[0].path.to_string(), "pages[0].last_verified");
        assert_eq!(acc.errors()[1].path.to_string(), "site_name");
    }

    #[test]
    fn failure_field_names_match_their_paths() {
        let v = json!({
            "schema_version": "0.1.0",
            "site_url": 3,
            "pages": ["not an object"],
            "concepts": [{ "id": "9lives", "name": "N", "definition": "D", "depends_on": [1] }],
            "few_shot_examples": [{ "intent": "lookup", "question": "What?" }]
        });
        let n = ExtendedSchema::normalize(&v, SchemaVersion::parse("0.1.0").unwrap()).unwrap();
        let fields: Vec<&str> = n.failures.iter().map(|(_, e)| e.field()).collect();
        assert_eq!(
            fields,
            vec![
                "site_url",
                "pages[0]",
                "concepts[0].id",
                "concepts[0].depends_on[0]",
                "few_shot_examples[0].ideal_answer",
            ]
        );
        for (path, err) in &n.failures {
            assert_eq!(err.field(), path.to_string());
        }
    }

    #[test]
    fn extended_level_requires_every_list() {
        let acc = check_extended(Accumulator::new(ValidationMode::CollectAll), None);
        let paths: Vec<String> = acc.errors().iter().map(|v| v.path.to_string()).collect();
        assert_eq!(paths, vec!["pages", "concepts", "few_shot_examples"]);
    }
}
