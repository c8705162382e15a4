//! Structural parser: classified lines -> [`Document`].
//!
//! A phase state machine, `Start -> Title -> Description -> Body ->
//! Sections -> Done`. Parsing never aborts; every problem becomes a
//! line-numbered [`Diagnostic`] attached to a best-effort tree.

use crate::ast::{Document, DocumentStats, FileEntry, Section};
use crate::classify;
use crate::config::ParseOptions;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::lexer::{self, EntryParts, Line, LineKind};
use crate::links::{classify_url, UrlKind};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Parse raw bytes with default options.
pub fn parse(input: &[u8]) -> Document {
    parse_with(input, &ParseOptions::default())
}

pub fn parse_str(input: &str) -> Document {
    parse_with(input.as_bytes(), &ParseOptions::default())
}

/// Decode, classify, parse and type-classify one document.
pub fn parse_with(input: &[u8], options: &ParseOptions) -> Document {
    let decoded = lexer::decode(input);
    if decoded.fatal {
        debug!(bytes = decoded.byte_count, "input rejected during decoding");
        return Document {
            diagnostics: decoded.diagnostics,
            stats: DocumentStats {
                byte_count: decoded.byte_count,
                ..DocumentStats::default()
            },
            ..Document::default()
        };
    }

    let lines = lexer::classify(&decoded.text, options.max_line_chars);
    debug!(lines = lines.len(), bytes = decoded.byte_count, "parsing document");

    let mut parser = Parser::new(&lines, decoded.diagnostics);
    parser.run();
    let mut doc = parser.finish(decoded.byte_count, options);

    if !doc.has_code(DiagnosticCode::E001EmptyInput) {
        let classification = classify::classify(&doc, options);
        doc.document_type = classification.document_type;
        if let Some(reason) = classification.reason {
            doc.diagnostics.push(Diagnostic::new(
                DiagnosticCode::W011FullDocument,
                0,
                format!("document classified as Full: {}", reason),
            ));
        }
    }

    // Stable: same-line diagnostics keep discovery order.
    doc.diagnostics.sort_by_key(|d| d.line);
    debug!(
        sections = doc.sections.len(),
        entries = doc.entry_count(),
        diagnostics = doc.diagnostics.len(),
        document_type = %doc.document_type,
        "parse complete"
    );
    doc
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Title,
    Description,
    Body,
    Sections,
    Done,
}

struct Parser<'a> {
    lines: &'a [Line],
    pos: usize,
    phase: Phase,
    diagnostics: Vec<Diagnostic>,
    title: Option<String>,
    title_line: u32,
    description: Vec<String>,
    body: Vec<String>,
    sections: Vec<Section>,
    /// Inside an H2 block that appeared before the title (E004 recovery).
    skipping_orphan: bool,
    /// Line of the currently open code fence.
    fence: Option<u32>,
    seen_urls: HashMap<String, u32>,
    h1_count: usize,
}

impl<'a> Parser<'a> {
    fn new(lines: &'a [Line], diagnostics: Vec<Diagnostic>) -> Self {
        Parser {
            lines,
            pos: 0,
            phase: Phase::Start,
            diagnostics,
            title: None,
            title_line: 0,
            description: Vec::new(),
            body: Vec::new(),
            sections: Vec::new(),
            skipping_orphan: false,
            fence: None,
            seen_urls: HashMap::new(),
            h1_count: 0,
        }
    }

    fn emit(&mut self, code: DiagnosticCode, line: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(code, line, message));
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = ?self.phase, to = ?phase, line = self.pos + 1, "phase transition");
        self.phase = phase;
    }

    fn run(&mut self) {
        if self.lines.iter().all(|l| l.kind == LineKind::Blank) {
            self.emit(
                DiagnosticCode::E001EmptyInput,
                0,
                DiagnosticCode::E001EmptyInput.message(),
            );
            self.enter(Phase::Done);
            return;
        }

        self.scan_line_limits();
        self.enter(Phase::Title);

        let lines = self.lines;
        while let Some(line) = lines.get(self.pos) {
            let consumed = match self.phase {
                Phase::Title => self.title_phase(line),
                Phase::Description => self.description_phase(line),
                Phase::Body => self.body_phase(line),
                Phase::Sections => self.sections_phase(line),
                Phase::Start | Phase::Done => true,
            };
            if consumed {
                self.pos += 1;
            }
        }
        self.end_of_input();
    }

    /// Per-line findings that do not depend on the phase.
    fn scan_line_limits(&mut self) {
        let lines = self.lines;
        for line in lines {
            if line.oversized {
                self.emit(
                    DiagnosticCode::W008OversizedLine,
                    line.number,
                    format!(
                        "line is {} characters long; it was not parsed",
                        line.text.chars().count()
                    ),
                );
            }
            if line.mixed_indent && line.kind != LineKind::Blank {
                self.emit(
                    DiagnosticCode::I004MixedIndentation,
                    line.number,
                    DiagnosticCode::I004MixedIndentation.message(),
                );
            }
        }
    }

    // -- Phases ---------------------------------------------------

    fn title_phase(&mut self, line: &Line) -> bool {
        match &line.kind {
            LineKind::Blank => {}
            LineKind::Title(text) => {
                self.h1_count += 1;
                self.title_line = line.number;
                if text.is_empty() {
                    self.emit(DiagnosticCode::E002MissingTitle, line.number, "H1 title is empty");
                } else {
                    self.title = Some(text.clone());
                }
                self.skipping_orphan = false;
                self.enter(Phase::Description);
            }
            LineKind::Section(name) => {
                self.emit(
                    DiagnosticCode::E004SectionBeforeTitle,
                    line.number,
                    format!("section '{}' appears before the title; skipped", name),
                );
                self.skipping_orphan = true;
            }
            _ if self.skipping_orphan => {}
            _ => {
                let recovered = line.text.trim_start_matches(['#', ' ', '\t']).trim();
                self.emit(
                    DiagnosticCode::E002MissingTitle,
                    line.number,
                    format!("expected '# Title', found '{}'", truncate(line.text.trim(), 80)),
                );
                self.title_line = line.number;
                if !recovered.is_empty() {
                    self.title = Some(recovered.to_string());
                }
                self.enter(Phase::Description);
            }
        }
        true
    }

    fn description_phase(&mut self, line: &Line) -> bool {
        match &line.kind {
            LineKind::Blockquote(text) => {
                self.description.push(text.clone());
                true
            }
            LineKind::Blank if self.description.is_empty() => true,
            LineKind::Blank => {
                self.enter(Phase::Body);
                true
            }
            _ => {
                if self.description.is_empty() {
                    self.emit(
                        DiagnosticCode::W001MissingDescription,
                        line.number,
                        "expected a '> description' blockquote after the title",
                    );
                }
                self.enter(Phase::Body);
                false
            }
        }
    }

    fn body_phase(&mut self, line: &Line) -> bool {
        if self.fence.is_some() {
            self.body.push(line.text.trim_end().to_string());
            if line.kind == LineKind::Fence {
                self.fence = None;
            }
            return true;
        }
        match &line.kind {
            LineKind::Section(_) => {
                self.enter(Phase::Sections);
                return false;
            }
            LineKind::Blank => {
                self.body.push(String::new());
                return true;
            }
            _ => self.note_content_line(line),
        }
        self.body.push(line.text.trim_end().to_string());
        true
    }

    fn sections_phase(&mut self, line: &Line) -> bool {
        let text = line.text.trim_end().to_string();
        if self.fence.is_some() {
            if line.kind == LineKind::Fence {
                self.fence = None;
            }
            self.push_prose(text);
            return true;
        }
        match &line.kind {
            LineKind::Section(name) => {
                self.sections.push(Section::new(name, line.number));
            }
            LineKind::Blank => {}
            LineKind::Entry(parts) => self.push_entry(parts, line.number),
            LineKind::MalformedEntry => {
                self.emit(
                    DiagnosticCode::E005MalformedEntry,
                    line.number,
                    format!(
                        "'{}' does not match '- [title](url): notes'",
                        truncate(line.text.trim(), 80)
                    ),
                );
                self.push_prose(text);
            }
            LineKind::BareUrl(url) => {
                self.emit(
                    DiagnosticCode::E008BareUrl,
                    line.number,
                    format!("bare URL '{}' without '[title](url)' syntax", url),
                );
                self.push_prose(text);
            }
            _ => {
                self.note_content_line(line);
                self.push_prose(text);
            }
        }
        true
    }

    /// Findings for free-text lines in the body or a section.
    fn note_content_line(&mut self, line: &Line) {
        match &line.kind {
            LineKind::Title(t) => {
                self.h1_count += 1;
                self.emit(
                    DiagnosticCode::W003MultipleTitles,
                    line.number,
                    format!(
                        "additional H1 '{}' treated as text; the title is line {}",
                        t, self.title_line
                    ),
                );
            }
            LineKind::SubHeading { level, .. } => self.emit(
                DiagnosticCode::I001SubHeading,
                line.number,
                format!("H{} heading treated as prose", level),
            ),
            LineKind::Fence => {
                self.fence = Some(line.number);
                self.emit(
                    DiagnosticCode::I006FencedCode,
                    line.number,
                    DiagnosticCode::I006FencedCode.message(),
                );
            }
            LineKind::Prose if line.inline_link => self.emit(
                DiagnosticCode::I003InlineLink,
                line.number,
                DiagnosticCode::I003InlineLink.message(),
            ),
            _ => {}
        }
    }

    fn push_prose(&mut self, text: String) {
        if let Some(section) = self.sections.last_mut() {
            section.prose.push(text);
        }
    }

    fn push_entry(&mut self, parts: &EntryParts, line: u32) {
        if parts.indent > 0 {
            self.emit(
                DiagnosticCode::I007NestedListItem,
                line,
                format!("list item indented by {}", parts.indent),
            );
        }
        if parts.title.is_empty() {
            self.emit(
                DiagnosticCode::W007EmptyEntryTitle,
                line,
                format!("link to '{}' has no title", parts.url),
            );
        }
        if parts.url.is_empty() {
            self.emit(
                DiagnosticCode::W004EmptyUrl,
                line,
                format!("link '{}' has an empty URL", parts.title),
            );
        } else {
            match classify_url(&parts.url) {
                UrlKind::Http => {}
                UrlKind::Relative => self.emit(
                    DiagnosticCode::W005RelativeUrl,
                    line,
                    format!("relative URL '{}'", parts.url),
                ),
                UrlKind::Malformed => self.emit(
                    DiagnosticCode::W006MalformedUrl,
                    line,
                    format!("malformed URL '{}'", parts.url),
                ),
            }
            if let Some(first) = self.seen_urls.get(&parts.url).copied() {
                self.emit(
                    DiagnosticCode::I002DuplicateUrl,
                    line,
                    format!("URL '{}' already listed at line {}", parts.url, first),
                );
            } else {
                self.seen_urls.insert(parts.url.clone(), line);
            }
        }

        if let Some(section) = self.sections.last_mut() {
            section.entries.push(FileEntry {
                title: parts.title.clone(),
                url: parts.url.clone(),
                notes: parts.notes.clone(),
                line,
            });
        }
    }

    fn end_of_input(&mut self) {
        match self.phase {
            Phase::Title => self.emit(DiagnosticCode::E002MissingTitle, 0, "no H1 title found"),
            Phase::Description if self.description.is_empty() => self.emit(
                DiagnosticCode::W001MissingDescription,
                self.title_line,
                "expected a '> description' blockquote after the title",
            ),
            _ => {}
        }
        if let Some(open) = self.fence {
            trace!(line = open, "code fence left open at end of input");
        }

        for s in &self.sections {
            if s.is_empty() {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticCode::W002EmptySection,
                    s.line,
                    format!("section '{}' has no entries or content", s.name),
                ));
            }
        }
        if self.sections.is_empty() {
            self.emit(
                DiagnosticCode::E003NoSections,
                0,
                "reached end of input without any '## Section'",
            );
        }
        self.enter(Phase::Done);
    }

    fn finish(self, byte_count: usize, options: &ParseOptions) -> Document {
        let mut diagnostics = self.diagnostics;
        if byte_count > options.max_file_bytes {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::W009OversizedFile,
                0,
                format!(
                    "input is {} bytes; the limit is {}",
                    byte_count, options.max_file_bytes
                ),
            ));
        }

        let description = self
            .description
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Document {
            title: self.title,
            description: (!description.is_empty()).then_some(description),
            body: join_body(self.body),
            sections: self.sections,
            diagnostics,
            document_type: Default::default(),
            stats: DocumentStats {
                line_count: self.lines.len(),
                byte_count,
                h1_count: self.h1_count,
            },
        }
    }
}

fn join_body(mut lines: Vec<String>) -> Option<String> {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let start = lines.iter().position(|l| !l.is_empty())?;
    Some(lines[start..].join("\n"))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}
