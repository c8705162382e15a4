//! Line classifier: byte decoding plus per-line tagging.
//!
//! Decoding strips a UTF-8 BOM, refuses binary input (null bytes), falls
//! back to Latin-1 when the bytes are not UTF-8 and folds CRLF/CR line
//! endings into LF. Classification then tags each line independently.
//! It never fails; reacting to unexpected line kinds is the parser's job.
//!
//! All patterns are compiled with the `regex` crate, whose matcher runs
//! in linear time, so hostile titles or URLs cannot trigger backtracking
//! blowups. Oversized lines skip pattern matching entirely.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use regex::Regex;
use std::sync::LazyLock;

// -- Patterns -----------------------------------------------------------------

static RE_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[ \t]+(.*?))?[ \t]*$").unwrap());

static RE_H2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##(?:[ \t]+(.*?))?[ \t]*$").unwrap());

static RE_SUBHEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{3,6})(?:[ \t]+(.*?))?[ \t]*$").unwrap());

static RE_BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>[ \t]?(.*)$").unwrap());

// - [title](url): notes
// The URL may contain one level of balanced parentheses.
static RE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([ \t]*)[-*+][ \t]+\[([^\]]*)\]\(((?:[^()\s]|\([^()\s]*\))*)\)(?:[ \t]*:[ \t]*(.*?))?[ \t]*$",
    )
    .unwrap()
});

// A list item that opens a link but does not complete the entry grammar.
static RE_LINK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[-*+][ \t]+\[").unwrap());

static RE_BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*+][ \t]+)?<?(https?://[^\s<>]+)>?[ \t]*$").unwrap()
});

static RE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]{0,3}(?:```|~~~)").unwrap());

static RE_INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").unwrap());

const BOM: &[u8] = b"\xEF\xBB\xBF";

// -- Decoding -----------------------------------------------------------------

/// Text ready for classification, plus the findings made while decoding.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the input cannot be treated as text at all (E007).
    pub fatal: bool,
    pub byte_count: usize,
}

pub fn decode(bytes: &[u8]) -> Decoded {
    let mut out = Decoded {
        byte_count: bytes.len(),
        ..Decoded::default()
    };

    if let Some(pos) = bytes.iter().position(|&b| b == 0) {
        out.diagnostics.push(Diagnostic::new(
            DiagnosticCode::E007NullBytes,
            line_of_offset(bytes, pos),
            format!("null byte at offset {}; input looks binary", pos),
        ));
        out.fatal = true;
        return out;
    }

    let mut bytes = bytes;
    if let Some(rest) = bytes.strip_prefix(BOM) {
        out.diagnostics
            .push(Diagnostic::from_code(DiagnosticCode::I005BomStripped, 1));
        bytes = rest;
    }

    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(e) => {
            let offset = e.valid_up_to();
            out.diagnostics.push(Diagnostic::new(
                DiagnosticCode::E006InvalidEncoding,
                line_of_offset(bytes, offset),
                format!(
                    "invalid UTF-8 at byte {}; decoded as Latin-1 instead",
                    offset
                ),
            ));
            // Latin-1 maps every byte to the code point of the same value.
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    };

    out.text = if text.contains('\r') {
        out.diagnostics
            .push(Diagnostic::from_code(DiagnosticCode::W010LegacyLineEndings, 0));
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    };
    out
}

fn line_of_offset(bytes: &[u8], offset: usize) -> u32 {
    let newlines = bytes[..offset.min(bytes.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    newlines as u32 + 1
}

// -- Classification -----------------------------------------------------------

/// The parts of a `- [title](url): notes` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryParts {
    /// Leading whitespace width; non-zero means a nested item.
    pub indent: usize,
    pub title: String,
    pub url: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Title(String),
    Section(String),
    SubHeading { level: usize, text: String },
    Blockquote(String),
    Entry(EntryParts),
    MalformedEntry,
    BareUrl(String),
    Fence,
    Prose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: u32,
    pub text: String,
    pub kind: LineKind,
    /// Leading whitespace mixes tabs and spaces.
    pub mixed_indent: bool,
    /// Longer than the configured limit; classified as prose unseen.
    pub oversized: bool,
    /// Prose containing `[text](url)`.
    pub inline_link: bool,
}

/// Split normalized text into classified lines (1-based numbering).
pub fn classify(text: &str, max_line_chars: usize) -> Vec<Line> {
    text.lines()
        .enumerate()
        .map(|(i, l)| classify_line(i as u32 + 1, l, max_line_chars))
        .collect()
}

pub fn classify_line(number: u32, text: &str, max_line_chars: usize) -> Line {
    let oversized = text.len() > max_line_chars && text.chars().count() > max_line_chars;
    let kind = if text.trim().is_empty() {
        LineKind::Blank
    } else if oversized {
        LineKind::Prose
    } else {
        line_kind(text)
    };
    let inline_link = kind == LineKind::Prose && !oversized && RE_INLINE_LINK.is_match(text);
    Line {
        number,
        text: text.to_owned(),
        kind,
        mixed_indent: has_mixed_indent(text),
        oversized,
        inline_link,
    }
}

fn line_kind(text: &str) -> LineKind {
    if let Some(caps) = RE_H1.captures(text) {
        return LineKind::Title(capture(&caps, 1));
    }
    if let Some(caps) = RE_H2.captures(text) {
        return LineKind::Section(capture(&caps, 1));
    }
    if let Some(caps) = RE_SUBHEADING.captures(text) {
        return LineKind::SubHeading {
            level: caps[1].len(),
            text: capture(&caps, 2),
        };
    }
    if let Some(caps) = RE_BLOCKQUOTE.captures(text) {
        return LineKind::Blockquote(capture(&caps, 1).trim().to_string());
    }
    if RE_FENCE.is_match(text) {
        return LineKind::Fence;
    }
    if let Some(caps) = RE_ENTRY.captures(text) {
        let notes = caps
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .filter(|n| !n.is_empty());
        return LineKind::Entry(EntryParts {
            indent: caps[1].chars().count(),
            title: caps[2].trim().to_string(),
            url: caps[3].to_string(),
            notes,
        });
    }
    if RE_LINK_START.is_match(text) {
        return LineKind::MalformedEntry;
    }
    if let Some(caps) = RE_BARE_URL.captures(text) {
        return LineKind::BareUrl(caps[1].to_string());
    }
    LineKind::Prose
}

fn capture(caps: &regex::Captures<'_>, i: usize) -> String {
    caps.get(i).map_or_else(String::new, |m| m.as_str().to_string())
}

fn has_mixed_indent(text: &str) -> bool {
    let lead: Vec<char> = text.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
    lead.contains(&' ') && lead.contains(&'\t')
}
