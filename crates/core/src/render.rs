//! Canonical llms.txt text for a parsed [`Document`].

use crate::ast::{Document, FileEntry, Section};

/// Render `doc` back into llms.txt form.
///
/// Parsing the output again yields the same title, section names and
/// entry count for any document without error diagnostics.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(title) = &doc.title {
        out.push_str(&format!("# {}\n", title));
    }
    if let Some(desc) = &doc.description {
        out.push('\n');
        out.push_str(&format!("> {}\n", desc));
    }
    if let Some(body) = &doc.body {
        out.push('\n');
        out.push_str(body);
        out.push('\n');
    }
    for section in &doc.sections {
        out.push('\n');
        render_section(&mut out, section);
    }
    out
}

fn render_section(out: &mut String, section: &Section) {
    out.push_str(&format!("## {}\n", section.name));
    if !section.entries.is_empty() {
        out.push('\n');
    }
    for entry in &section.entries {
        render_entry(out, entry);
    }
    if !section.prose.is_empty() {
        out.push('\n');
        for line in &section.prose {
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn render_entry(out: &mut String, entry: &FileEntry) {
    out.push_str(&format!("- [{}]({})", entry.title, entry.url));
    if let Some(notes) = &entry.notes {
        out.push_str(": ");
        out.push_str(notes);
    }
    out.push('\n');
}
