//! Index vs Full document classification.

use crate::ast::{Document, DocumentType};
use crate::config::ParseOptions;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub document_type: DocumentType,
    /// Why the document was classified as Full; `None` for Index.
    pub reason: Option<String>,
}

/// Decide the document type from parse statistics.
///
/// More than one H1 outside fenced code means Full regardless of size;
/// otherwise a line count above `full_threshold_lines` means Full.
pub fn classify(doc: &Document, options: &ParseOptions) -> Classification {
    let stats = &doc.stats;
    let reason = if stats.h1_count > 1 {
        Some(format!("{} top-level H1 headers", stats.h1_count))
    } else if stats.line_count > options.full_threshold_lines {
        Some(format!(
            "{} lines exceeds the {}-line threshold",
            stats.line_count, options.full_threshold_lines
        ))
    } else {
        None
    };

    let document_type = if reason.is_some() {
        DocumentType::Full
    } else {
        DocumentType::Index
    };
    debug!(
        %document_type,
        h1_count = stats.h1_count,
        line_count = stats.line_count,
        "classified document"
    );
    Classification {
        document_type,
        reason,
    }
}
