use super::normalize::{Failure, ObjectReader};
use super::{check_http_url, check_len, serialize_date};
use crate::constants::{PAGE_SUMMARY_LEN, PAGE_TITLE_LEN};
use crate::violation::{FieldPath, Violation};
use serde::Serialize;
use serde_json::Value;
use time::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Tutorial,
    Reference,
    Changelog,
    Concept,
    Faq,
}

impl ContentType {
    pub const NAMES: &'static [&'static str] =
        &["tutorial", "reference", "changelog", "concept", "faq"];

    pub fn from_name(name: &str) -> Option<ContentType> {
        match name {
            "tutorial" => Some(ContentType::Tutorial),
            "reference" => Some(ContentType::Reference),
            "changelog" => Some(ContentType::Changelog),
            "concept" => Some(ContentType::Concept),
            "faq" => Some(ContentType::Faq),
            _ => None,
        }
    }
}

/// Metadata for one documentation page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub content_type: ContentType,
    #[serde(serialize_with = "serialize_date")]
    pub last_verified: Date,
    pub summary: String,
    #[serde(skip)]
    pub path: FieldPath,
}

impl Page {
    pub fn normalize(value: &Value, path: FieldPath) -> Result<Page, Vec<Failure>> {
        let mut r = ObjectReader::new(value, path).map_err(|f| vec![f])?;
        let url = r.required_str("url");
        let title = r.required_str("title");
        let content_type = r
            .required_enum("content_type", ContentType::NAMES)
            .and_then(|name| ContentType::from_name(&name));
        let last_verified = r.required_date("last_verified");
        let summary = r.required_str("summary");
        let path = r.path().clone();

        match (url, title, content_type, last_verified, summary) {
            (Some(url), Some(title), Some(content_type), Some(last_verified), Some(summary))
                if !r.has_failures() =>
            {
                Ok(Page {
                    url,
                    title,
                    content_type,
                    last_verified,
                    summary,
                    path,
                })
            }
            _ => Err(r.into_failures()),
        }
    }

    pub fn check(&self) -> Vec<Violation> {
        let p = &self.path;
        [
            check_http_url(&p.key("url"), &self.url),
            check_len(&p.key("title"), &self.title, PAGE_TITLE_LEN),
            check_len(&p.key("summary"), &self.summary, PAGE_SUMMARY_LEN),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
