//! Field bounds, schema versions and the canonical section-name table.

use serde::Serialize;
use std::fmt;

/// Extended-schema versions this validator understands, as (major, minor).
pub const SUPPORTED_SCHEMA_VERSIONS: &[(u64, u64)] = &[(0, 1)];
/// Current extended-schema version.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Sentinel printed in place of an empty field path.
pub const ROOT_PATH: &str = "<root>";

pub const PAGE_TITLE_LEN: (usize, usize) = (1, 200);
pub const PAGE_SUMMARY_LEN: (usize, usize) = (10, 280);
pub const CONCEPT_ID_PATTERN: &str = "^[a-z0-9_-]{3,50}$";
pub const CONCEPT_NAME_LEN: (usize, usize) = (1, 100);
pub const CONCEPT_DEFINITION_LEN: (usize, usize) = (20, 1000);
pub const EXAMPLE_INTENT_LEN: (usize, usize) = (5, 100);
pub const EXAMPLE_QUESTION_LEN: (usize, usize) = (5, 500);
pub const EXAMPLE_ANSWER_LEN: (usize, usize) = (20, 2000);
pub const SITE_NAME_LEN: (usize, usize) = (1, 100);

/// The eleven section names observed across published llms.txt files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CanonicalSection {
    #[serde(rename = "Master Index")]
    MasterIndex,
    #[serde(rename = "LLM Instructions")]
    LlmInstructions,
    #[serde(rename = "Getting Started")]
    GettingStarted,
    #[serde(rename = "Core Concepts")]
    CoreConcepts,
    #[serde(rename = "API Reference")]
    ApiReference,
    Examples,
    Configuration,
    #[serde(rename = "Advanced Topics")]
    AdvancedTopics,
    Troubleshooting,
    #[serde(rename = "FAQ")]
    Faq,
    Optional,
}

impl CanonicalSection {
    pub const ALL: [CanonicalSection; 11] = [
        CanonicalSection::MasterIndex,
        CanonicalSection::LlmInstructions,
        CanonicalSection::GettingStarted,
        CanonicalSection::CoreConcepts,
        CanonicalSection::ApiReference,
        CanonicalSection::Examples,
        CanonicalSection::Configuration,
        CanonicalSection::AdvancedTopics,
        CanonicalSection::Troubleshooting,
        CanonicalSection::Faq,
        CanonicalSection::Optional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalSection::MasterIndex => "Master Index",
            CanonicalSection::LlmInstructions => "LLM Instructions",
            CanonicalSection::GettingStarted => "Getting Started",
            CanonicalSection::CoreConcepts => "Core Concepts",
            CanonicalSection::ApiReference => "API Reference",
            CanonicalSection::Examples => "Examples",
            CanonicalSection::Configuration => "Configuration",
            CanonicalSection::AdvancedTopics => "Advanced Topics",
            CanonicalSection::Troubleshooting => "Troubleshooting",
            CanonicalSection::Faq => "FAQ",
            CanonicalSection::Optional => "Optional",
        }
    }

    /// Position in the canonical ordering; `Optional` has none (always last).
    pub fn order(self) -> Option<u8> {
        match self {
            CanonicalSection::Optional => None,
            other => CanonicalSection::ALL
                .iter()
                .position(|c| *c == other)
                .map(|p| p as u8 + 1),
        }
    }

    /// Resolve a section name, trying exact names first and then aliases.
    pub fn resolve(name: &str) -> Option<CanonicalSection> {
        let key = name.trim().to_lowercase();
        if let Some(c) = CanonicalSection::ALL
            .into_iter()
            .find(|c| c.name().to_lowercase() == key)
        {
            return Some(c);
        }
        SECTION_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, c)| *c)
    }
}

impl fmt::Display for CanonicalSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const SECTION_ALIASES: &[(&str, CanonicalSection)] = &[
    ("table of contents", CanonicalSection::MasterIndex),
    ("toc", CanonicalSection::MasterIndex),
    ("index", CanonicalSection::MasterIndex),
    ("docs", CanonicalSection::MasterIndex),
    ("documentation", CanonicalSection::MasterIndex),
    ("instructions", CanonicalSection::LlmInstructions),
    ("agent instructions", CanonicalSection::LlmInstructions),
    ("quickstart", CanonicalSection::GettingStarted),
    ("quick start", CanonicalSection::GettingStarted),
    ("installation", CanonicalSection::GettingStarted),
    ("setup", CanonicalSection::GettingStarted),
    ("concepts", CanonicalSection::CoreConcepts),
    ("key concepts", CanonicalSection::CoreConcepts),
    ("fundamentals", CanonicalSection::CoreConcepts),
    ("api", CanonicalSection::ApiReference),
    ("reference", CanonicalSection::ApiReference),
    ("endpoints", CanonicalSection::ApiReference),
    ("usage", CanonicalSection::Examples),
    ("use cases", CanonicalSection::Examples),
    ("tutorials", CanonicalSection::Examples),
    ("recipes", CanonicalSection::Examples),
    ("config", CanonicalSection::Configuration),
    ("settings", CanonicalSection::Configuration),
    ("options", CanonicalSection::Configuration),
    ("advanced", CanonicalSection::AdvancedTopics),
    ("internals", CanonicalSection::AdvancedTopics),
    ("debugging", CanonicalSection::Troubleshooting),
    ("common issues", CanonicalSection::Troubleshooting),
    ("known issues", CanonicalSection::Troubleshooting),
    ("frequently asked questions", CanonicalSection::Faq),
    ("supplementary", CanonicalSection::Optional),
    ("appendix", CanonicalSection::Optional),
    ("extras", CanonicalSection::Optional),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_and_aliases_case_insensitively() {
        assert_eq!(
            CanonicalSection::resolve("getting started"),
            Some(CanonicalSection::GettingStarted)
        );
        assert_eq!(
            CanonicalSection::resolve("  Docs "),
            Some(CanonicalSection::MasterIndex)
        );
        assert_eq!(
            CanonicalSection::resolve("Appendix"),
            Some(CanonicalSection::Optional)
        );
        assert_eq!(CanonicalSection::resolve("Blog"), None);
    }

    #[test]
    fn optional_has_no_fixed_position() {
        assert_eq!(CanonicalSection::MasterIndex.order(), Some(1));
        assert_eq!(CanonicalSection::Faq.order(), Some(10));
        assert_eq!(CanonicalSection::Optional.order(), None);
    }
}
