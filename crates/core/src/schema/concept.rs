use super::normalize::{Failure, ObjectReader};
use super::{check_len, check_url_list};
use crate::constants::{CONCEPT_DEFINITION_LEN, CONCEPT_ID_PATTERN, CONCEPT_NAME_LEN};
use crate::error::NormalizeError;
use crate::violation::{FieldPath, Violation, ViolationKind};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static RE_CONCEPT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(CONCEPT_ID_PATTERN).unwrap());

/// A named domain term with its dependencies on other concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept {
    /// Trimmed and lower-cased.
    pub id: String,
    pub name: String,
    pub definition: String,
    pub related_pages: Vec<String>,
    /// Normalized the same way as `id`.
    pub depends_on: Vec<String>,
    pub anti_patterns: Vec<String>,
    #[serde(skip)]
    pub path: FieldPath,
}

/// A concept that failed normalization, keeping the parts that survived.
///
/// The id and `depends_on` entries still take part in the level 3
/// reference checks.
#[derive(Debug, Clone)]
pub struct PartialConcept {
    pub id: Option<String>,
    /// String entries of `depends_on`, folded like `Concept::depends_on`.
    pub depends_on: Vec<String>,
    pub failures: Vec<Failure>,
    pub path: FieldPath,
}

/// Trim and lower-case an id. Ids starting with an uppercase letter or a
/// digit are rejected before folding.
pub fn normalize_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed.chars().next() {
        Some(c) if c.is_uppercase() || c.is_ascii_digit() => None,
        _ => Some(trimmed.to_lowercase()),
    }
}

pub fn fold_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl Concept {
    pub fn normalize(value: &Value, path: FieldPath) -> Result<Concept, PartialConcept> {
        let mut r = ObjectReader::new(value, path.clone()).map_err(|f| PartialConcept {
            id: None,
            depends_on: Vec::new(),
            failures: vec![f],
            path,
        })?;

        let id = r.required_str("id").and_then(|raw| {
            let id = normalize_id(&raw);
            if id.is_none() {
                let field = r.path().key("id").to_string();
                r.fail("id", NormalizeError::InvalidIdentifier { field, input: raw });
            }
            id
        });
        let name = r.required_str("name");
        let definition = r.required_str("definition");
        let related_pages = r.str_list("related_pages");
        let depends_on: Vec<String> = r
            .str_list("depends_on")
            .iter()
            .map(|d| fold_id(d))
            .collect();
        let anti_patterns = r.str_list("anti_patterns");
        let path = r.path().clone();

        match (id, name, definition) {
            (Some(id), Some(name), Some(definition)) if !r.has_failures() => Ok(Concept {
                id,
                name,
                definition,
                related_pages,
                depends_on,
                anti_patterns,
                path,
            }),
            (id, _, _) => Err(PartialConcept {
                id,
                depends_on,
                failures: r.into_failures(),
                path,
            }),
        }
    }

    pub fn check(&self) -> Vec<Violation> {
        let p = &self.path;
        let mut out = Vec::new();
        if !RE_CONCEPT_ID.is_match(&self.id) {
            out.push(
                Violation::new(
                    p.key("id"),
                    ViolationKind::PatternMismatch {
                        pattern: CONCEPT_ID_PATTERN,
                    },
                )
                .with_value(self.id.as_str()),
            );
        }
        out.extend(check_len(&p.key("name"), &self.name, CONCEPT_NAME_LEN));
        out.extend(check_len(
            &p.key("definition"),
            &self.definition,
            CONCEPT_DEFINITION_LEN,
        ));
        out.extend(check_url_list(&p.key("related_pages"), &self.related_pages));
        out
    }
}
