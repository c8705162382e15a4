//! Normalization stage: raw JSON values -> canonical typed values.
//!
//! Only converts representations. Lengths, formats and patterns are the
//! constraint stage's business; nothing here looks at them.

use crate::error::NormalizeError;
use crate::violation::FieldPath;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// A normalization failure together with where it happened.
pub type Failure = (FieldPath, NormalizeError);

/// Descriptive type name for a JSON value (for error messages).
pub fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse `YYYY-MM-DD`, or take the date part of an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<Date> {
    let s = s.trim();
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| OffsetDateTime::parse(s, &Rfc3339).ok().map(|dt| dt.date()))
}

pub fn format_date(date: &Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Field-by-field reader over one JSON object.
///
/// Every accessor records a failure instead of returning an error, so one
/// pass over an object reports all of its bad fields.
pub struct ObjectReader<'a> {
    obj: &'a Map<String, Value>,
    path: FieldPath,
    failures: Vec<Failure>,
}

impl<'a> ObjectReader<'a> {
    pub fn new(value: &'a Value, path: FieldPath) -> Result<Self, Failure> {
        match value {
            Value::Object(obj) => Ok(ObjectReader {
                obj,
                path,
                failures: Vec::new(),
            }),
            other => Err((
                path.clone(),
                NormalizeError::TypeMismatch {
                    field: path.to_string(),
                    expected: "object",
                    found: json_type_name(other),
                    input: compact(other),
                },
            )),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn fail(&mut self, key: &str, err: NormalizeError) {
        self.failures.push((self.path.key(key), err));
    }

    fn field_name(&self, key: &str) -> String {
        self.path.key(key).to_string()
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    fn mismatch(&mut self, key: &str, expected: &'static str, found: &Value) {
        let err = NormalizeError::TypeMismatch {
            field: self.field_name(key),
            expected,
            found: json_type_name(found),
            input: compact(found),
        };
        self.fail(key, err);
    }

    pub fn required_str(&mut self, key: &str) -> Option<String> {
        match self.present(key) {
            None => {
                let err = NormalizeError::Missing {
                    field: self.field_name(key),
                };
                self.fail(key, err);
                None
            }
            Some(v) => self.as_string(key, v),
        }
    }

    pub fn optional_str(&mut self, key: &str) -> Option<String> {
        let v = self.present(key)?;
        self.as_string(key, v)
    }

    fn as_string(&mut self, key: &str, v: &Value) -> Option<String> {
        match v.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.mismatch(key, "string", v);
                None
            }
        }
    }

    pub fn required_date(&mut self, key: &str) -> Option<Date> {
        let raw = self.required_str(key)?;
        self.to_date(key, raw)
    }

    pub fn optional_date(&mut self, key: &str) -> Option<Date> {
        let raw = self.optional_str(key)?;
        self.to_date(key, raw)
    }

    fn to_date(&mut self, key: &str, raw: String) -> Option<Date> {
        let date = parse_date(&raw);
        if date.is_none() {
            let err = NormalizeError::InvalidDate {
                field: self.field_name(key),
                input: raw,
            };
            self.fail(key, err);
        }
        date
    }

    /// A required string matched case-insensitively against `allowed`.
    pub fn required_enum(&mut self, key: &str, allowed: &'static [&'static str]) -> Option<String> {
        let raw = self.required_str(key)?;
        let folded = raw.trim().to_ascii_lowercase();
        if allowed.contains(&folded.as_str()) {
            Some(folded)
        } else {
            let err = NormalizeError::UnknownVariant {
                field: self.field_name(key),
                input: raw,
                allowed,
            };
            self.fail(key, err);
            None
        }
    }

    /// An optional array of strings; absent means empty.
    pub fn str_list(&mut self, key: &str) -> Vec<String> {
        let Some(v) = self.present(key) else {
            return Vec::new();
        };
        let Some(items) = v.as_array() else {
            self.mismatch(key, "array", v);
            return Vec::new();
        };
        let list_path = self.path.key(key);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => out.push(s.to_string()),
                None => {
                    let at = list_path.index(i);
                    self.failures.push((
                        at.clone(),
                        NormalizeError::TypeMismatch {
                            field: at.to_string(),
                            expected: "string",
                            found: json_type_name(item),
                            input: compact(item),
                        },
                    ));
                }
            }
        }
        out
    }

    /// An optional array of objects, yielded with their paths.
    pub fn object_list(&mut self, key: &str) -> Vec<(FieldPath, &'a Value)> {
        let Some(v) = self.present(key) else {
            return Vec::new();
        };
        match v.as_array() {
            Some(items) => {
                let list_path = self.path.key(key);
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (list_path.index(i), item))
                    .collect()
            }
            None => {
                self.mismatch(key, "array", v);
                Vec::new()
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }
}

fn compact(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
