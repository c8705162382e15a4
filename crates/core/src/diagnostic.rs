//! Diagnostic catalog -- the stable code taxonomy shared by the parser and
//! the validator.
//!
//! Codes are part of the interchange contract: `E001`..`E008` are
//! structural errors, `W001`..`W011` quality warnings and `I001`..`I007`
//! informational observations. The severity is always derived from the
//! code prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic or validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

/// Every diagnostic code the parser and classifier can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    #[serde(rename = "E001")]
    E001EmptyInput,
    #[serde(rename = "E002")]
    E002MissingTitle,
    #[serde(rename = "E003")]
    E003NoSections,
    #[serde(rename = "E004")]
    E004SectionBeforeTitle,
    #[serde(rename = "E005")]
    E005MalformedEntry,
    #[serde(rename = "E006")]
    E006InvalidEncoding,
    #[serde(rename = "E007")]
    E007NullBytes,
    #[serde(rename = "E008")]
    E008BareUrl,
    #[serde(rename = "W001")]
    W001MissingDescription,
    #[serde(rename = "W002")]
    W002EmptySection,
    #[serde(rename = "W003")]
    W003MultipleTitles,
    #[serde(rename = "W004")]
    W004EmptyUrl,
    #[serde(rename = "W005")]
    W005RelativeUrl,
    #[serde(rename = "W006")]
    W006MalformedUrl,
    #[serde(rename = "W007")]
    W007EmptyEntryTitle,
    #[serde(rename = "W008")]
    W008OversizedLine,
    #[serde(rename = "W009")]
    W009OversizedFile,
    #[serde(rename = "W010")]
    W010LegacyLineEndings,
    #[serde(rename = "W011")]
    W011FullDocument,
    #[serde(rename = "I001")]
    I001SubHeading,
    #[serde(rename = "I002")]
    I002DuplicateUrl,
    #[serde(rename = "I003")]
    I003InlineLink,
    #[serde(rename = "I004")]
    I004MixedIndentation,
    #[serde(rename = "I005")]
    I005BomStripped,
    #[serde(rename = "I006")]
    I006FencedCode,
    #[serde(rename = "I007")]
    I007NestedListItem,
}

use DiagnosticCode::*;

impl DiagnosticCode {
    /// All codes in catalog order.
    pub const ALL: [DiagnosticCode; 26] = [
        E001EmptyInput,
        E002MissingTitle,
        E003NoSections,
        E004SectionBeforeTitle,
        E005MalformedEntry,
        E006InvalidEncoding,
        E007NullBytes,
        E008BareUrl,
        W001MissingDescription,
        W002EmptySection,
        W003MultipleTitles,
        W004EmptyUrl,
        W005RelativeUrl,
        W006MalformedUrl,
        W007EmptyEntryTitle,
        W008OversizedLine,
        W009OversizedFile,
        W010LegacyLineEndings,
        W011FullDocument,
        I001SubHeading,
        I002DuplicateUrl,
        I003InlineLink,
        I004MixedIndentation,
        I005BomStripped,
        I006FencedCode,
        I007NestedListItem,
    ];

    /// The stable code string, e.g. `"E001"`.
    pub fn as_str(self) -> &'static str {
        match self {
            E001EmptyInput => "E001",
            E002MissingTitle => "E002",
            E003NoSections => "E003",
            E004SectionBeforeTitle => "E004",
            E005MalformedEntry => "E005",
            E006InvalidEncoding => "E006",
            E007NullBytes => "E007",
            E008BareUrl => "E008",
            W001MissingDescription => "W001",
            W002EmptySection => "W002",
            W003MultipleTitles => "W003",
            W004EmptyUrl => "W004",
            W005RelativeUrl => "W005",
            W006MalformedUrl => "W006",
            W007EmptyEntryTitle => "W007",
            W008OversizedLine => "W008",
            W009OversizedFile => "W009",
            W010LegacyLineEndings => "W010",
            W011FullDocument => "W011",
            I001SubHeading => "I001",
            I002DuplicateUrl => "I002",
            I003InlineLink => "I003",
            I004MixedIndentation => "I004",
            I005BomStripped => "I005",
            I006FencedCode => "I006",
            I007NestedListItem => "I007",
        }
    }

    /// Look a code up by its stable string.
    pub fn from_code(code: &str) -> Option<DiagnosticCode> {
        DiagnosticCode::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }

    /// Severity derived from the code prefix (E/W/I).
    pub fn severity(self) -> Severity {
        match self.as_str().as_bytes()[0] {
            b'E' => Severity::Error,
            b'W' => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Numeric part of the code (`W011` -> 11).
    pub fn number(self) -> u8 {
        self.as_str()[1..].parse().unwrap_or(0)
    }

    /// One-line description of the condition.
    pub fn message(self) -> &'static str {
        match self {
            E001EmptyInput => "Input is empty or contains only whitespace.",
            E002MissingTitle => "Missing or malformed H1 title.",
            E003NoSections => "No H2 sections found.",
            E004SectionBeforeTitle => "H2 section appears before the H1 title.",
            E005MalformedEntry => "Malformed link entry.",
            E006InvalidEncoding => "Input is not valid UTF-8.",
            E007NullBytes => "Input contains null bytes (likely binary).",
            E008BareUrl => "Bare URL without link syntax.",
            W001MissingDescription => "No blockquote description after the title.",
            W002EmptySection => "Section has no entries or content.",
            W003MultipleTitles => "Additional H1 title found.",
            W004EmptyUrl => "Link entry has an empty URL.",
            W005RelativeUrl => "Link entry uses a relative URL.",
            W006MalformedUrl => "Link entry URL is malformed.",
            W007EmptyEntryTitle => "Link entry has an empty title.",
            W008OversizedLine => "Line exceeds the maximum length.",
            W009OversizedFile => "Input exceeds the maximum size.",
            W010LegacyLineEndings => "Input uses CR or CRLF line endings.",
            W011FullDocument => "Document classified as Full (inline content).",
            I001SubHeading => "Sub-heading treated as prose.",
            I002DuplicateUrl => "URL already listed elsewhere in the document.",
            I003InlineLink => "Inline link outside a list entry.",
            I004MixedIndentation => "Line indentation mixes tabs and spaces.",
            I005BomStripped => "UTF-8 byte order mark stripped.",
            I006FencedCode => "Fenced code block treated as prose.",
            I007NestedListItem => "Nested list item.",
        }
    }

    /// Remediation hint shown alongside the message.
    pub fn remediation(self) -> &'static str {
        match self {
            E001EmptyInput => "Add content: at minimum an H1 title, a blockquote, and one H2 section.",
            E002MissingTitle => "Start the file with a single '# Title' line.",
            E003NoSections => "Group links under at least one '## Section' header.",
            E004SectionBeforeTitle => "Move the H1 title above every H2 section.",
            E005MalformedEntry => "Use the form '- [Title](url): optional notes'.",
            E006InvalidEncoding => "Re-save the file as UTF-8.",
            E007NullBytes => "Make sure the file is text, not a binary artifact.",
            E008BareUrl => "Wrap the URL as '- [Title](url)'.",
            W001MissingDescription => "Add a '> description' line right after the title.",
            W002EmptySection => "Add entries to the section or remove it.",
            W003MultipleTitles => "Keep one H1; use H2 for sections.",
            W004EmptyUrl => "Fill in the link target or remove the entry.",
            W005RelativeUrl => "Use an absolute http(s) URL or document the base URL.",
            W006MalformedUrl => "Fix the URL so that it parses as an http(s) address.",
            W007EmptyEntryTitle => "Give the link a descriptive title.",
            W008OversizedLine => "Break the line up; very long lines are not parsed.",
            W009OversizedFile => "Split the document into an index plus per-section files.",
            W010LegacyLineEndings => "Convert line endings to LF.",
            W011FullDocument => "Consider publishing a curated Index companion file.",
            I001SubHeading => "Use H2 for sections; deeper headings are not structural.",
            I002DuplicateUrl => "List each URL once, in its most relevant section.",
            I003InlineLink => "Move the link into a '- [Title](url)' entry.",
            I004MixedIndentation => "Indent with spaces only.",
            I005BomStripped => "Save the file without a byte order mark.",
            I006FencedCode => "Code blocks are kept verbatim as prose.",
            I007NestedListItem => "Flatten nested entries into the section list.",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parse/classification finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based source line; 0 for whole-file findings.
    pub line: u32,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, line: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            line,
            severity: code.severity(),
            code,
            message: message.into(),
        }
    }

    /// Diagnostic using the catalog message verbatim.
    pub fn from_code(code: DiagnosticCode, line: u32) -> Self {
        Diagnostic::new(code, line, code.message())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} [{}] {}",
            self.line, self.severity, self.code, self.message
        )
    }
}
