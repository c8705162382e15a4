//! Extended semantic model: pages, concepts and few-shot examples.
//!
//! Every entity is built in two explicit stages. `normalize` converts a raw
//! JSON value into typed fields and reports what it could not convert;
//! `check` runs length, format and pattern constraints on the typed value
//! and reports violations. The stages never interleave.

pub mod concept;
pub mod few_shot;
pub mod normalize;
pub mod page;

pub use concept::{Concept, PartialConcept};
pub use few_shot::FewShotExample;
pub use normalize::Failure;
pub use page::{ContentType, Page};

use crate::constants::{SITE_NAME_LEN, SUPPORTED_SCHEMA_VERSIONS};
use crate::error::SchemaInputError;
use crate::links::is_http_url;
use crate::violation::{FieldPath, Violation, ViolationKind};
use normalize::{format_date, json_type_name, ObjectReader};
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use time::Date;

static RE_SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").unwrap());

/// Read extended-schema JSON text. The root must be an object.
pub fn read_json(src: &str) -> Result<Value, SchemaInputError> {
    let value: Value = serde_json::from_str(src)?;
    if !value.is_object() {
        return Err(SchemaInputError::NotAnObject(json_type_name(&value)));
    }
    Ok(value)
}

// ──────────────────────────────────────────────
// Schema version
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SchemaVersion {
    /// Parse `MAJOR.MINOR.PATCH`; anything else is `None`.
    pub fn parse(s: &str) -> Option<SchemaVersion> {
        let caps = RE_SEMVER.captures(s)?;
        Some(SchemaVersion {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_SCHEMA_VERSIONS.contains(&(self.major, self.minor))
    }

    /// Human-readable list of supported versions, e.g. `0.1.x`.
    pub fn supported_description() -> String {
        SUPPORTED_SCHEMA_VERSIONS
            .iter()
            .map(|(major, minor)| format!("{}.{}.x", major, minor))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ──────────────────────────────────────────────
// Extended schema root
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedSchema {
    pub schema_version: SchemaVersion,
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    #[serde(serialize_with = "serialize_opt_date")]
    pub last_updated: Option<Date>,
    pub pages: Vec<Page>,
    pub concepts: Vec<Concept>,
    pub few_shot_examples: Vec<FewShotExample>,
}

/// Output of the normalization stage.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Entities that failed normalization are left out.
    pub schema: ExtendedSchema,
    pub failures: Vec<Failure>,
    /// Concepts left out for failures in their other fields whose id
    /// survived. Their failures are already in `failures`.
    pub partial_concepts: Vec<PartialConcept>,
}

impl ExtendedSchema {
    /// Normalize a schema whose version has already passed the gate.
    pub fn normalize(value: &Value, version: SchemaVersion) -> Result<Normalized, Failure> {
        let mut reader = ObjectReader::new(value, FieldPath::root())?;
        let site_name = reader.optional_str("site_name");
        let site_url = reader.optional_str("site_url");
        let last_updated = reader.optional_date("last_updated");
        let raw_pages = reader.object_list("pages");
        let raw_concepts = reader.object_list("concepts");
        let raw_examples = reader.object_list("few_shot_examples");
        let mut failures = reader.into_failures();

        let mut pages = Vec::new();
        for (path, v) in raw_pages {
            match Page::normalize(v, path) {
                Ok(p) => pages.push(p),
                Err(f) => failures.extend(f),
            }
        }

        let mut concepts = Vec::new();
        let mut partial_concepts = Vec::new();
        for (path, v) in raw_concepts {
            match Concept::normalize(v, path) {
                Ok(c) => concepts.push(c),
                Err(mut partial) => {
                    failures.append(&mut partial.failures);
                    if partial.id.is_some() {
                        partial_concepts.push(partial);
                    }
                }
            }
        }

        let mut few_shot_examples = Vec::new();
        for (path, v) in raw_examples {
            match FewShotExample::normalize(v, path) {
                Ok(e) => few_shot_examples.push(e),
                Err(f) => failures.extend(f),
            }
        }

        Ok(Normalized {
            schema: ExtendedSchema {
                schema_version: version,
                site_name,
                site_url,
                last_updated,
                pages,
                concepts,
                few_shot_examples,
            },
            failures,
            partial_concepts,
        })
    }

    /// Constraint stage for the root fields and every entity.
    pub fn check(&self) -> Vec<Violation> {
        let root = FieldPath::root();
        let mut out = Vec::new();
        if let Some(name) = &self.site_name {
            out.extend(check_len(&root.key("site_name"), name, SITE_NAME_LEN));
        }
        if let Some(url) = &self.site_url {
            out.extend(check_http_url(&root.key("site_url"), url));
        }
        for p in &self.pages {
            out.extend(p.check());
        }
        for c in &self.concepts {
            out.extend(c.check());
        }
        for e in &self.few_shot_examples {
            out.extend(e.check());
        }
        out
    }

    pub fn page_urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.url.as_str())
    }
}

// ──────────────────────────────────────────────
// Shared constraint checks
// ──────────────────────────────────────────────

/// Inclusive length bounds, counted in characters.
pub fn check_len(path: &FieldPath, value: &str, (min, max): (usize, usize)) -> Option<Violation> {
    let actual = value.chars().count();
    let kind = if actual < min {
        ViolationKind::TooShort { min, actual }
    } else if actual > max {
        ViolationKind::TooLong { max, actual }
    } else {
        return None;
    };
    Some(Violation::new(path.clone(), kind).with_value(value))
}

pub fn check_http_url(path: &FieldPath, value: &str) -> Option<Violation> {
    if is_http_url(value) {
        return None;
    }
    Some(
        Violation::new(
            path.clone(),
            ViolationKind::InvalidFormat {
                format: "http(s) URL",
            },
        )
        .with_value(value),
    )
}

pub fn check_url_list(path: &FieldPath, urls: &[String]) -> Vec<Violation> {
    urls.iter()
        .enumerate()
        .filter_map(|(i, u)| check_http_url(&path.index(i), u))
        .collect()
}

pub(crate) fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(date))
}

pub(crate) fn serialize_opt_date<S: Serializer>(
    date: &Option<Date>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_str(&format_date(d)),
        None => serializer.serialize_none(),
    }
}
