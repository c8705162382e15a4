//! Level 3: concept dependency graph integrity and page references.
//!
//! Each concept is a node and each `depends_on` entry an edge. Only direct
//! self-loops are rejected; longer cycles are not searched for.

use crate::ast::Document;
use crate::schema::{ExtendedSchema, PartialConcept};
use crate::violation::{Accumulator, FieldPath, Violation, ViolationKind};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// One declared concept as seen by the reference checks. Concepts that
/// failed normalization elsewhere take part with whatever survived.
#[derive(Debug, Clone, Copy)]
struct Node<'a> {
    index: usize,
    id: &'a str,
    depends_on: &'a [String],
    path: &'a FieldPath,
}

/// Concept ids known to the document, with the source index of their
/// first declaration.
#[derive(Debug, Default)]
pub struct ConceptGraph<'a> {
    nodes: HashMap<&'a str, usize>,
}

impl<'a> ConceptGraph<'a> {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }
}

fn collect_nodes<'a>(schema: &'a ExtendedSchema, partial: &'a [PartialConcept]) -> Vec<Node<'a>> {
    let full = schema.concepts.iter().enumerate().map(|(i, c)| Node {
        index: c.path.last_index().unwrap_or(i),
        id: c.id.as_str(),
        depends_on: &c.depends_on,
        path: &c.path,
    });
    let partial = partial.iter().filter_map(|p| {
        Some(Node {
            index: p.path.last_index()?,
            id: p.id.as_deref()?,
            depends_on: &p.depends_on,
            path: &p.path,
        })
    });
    let mut nodes: Vec<Node<'a>> = full.chain(partial).collect();
    nodes.sort_by_key(|n| n.index);
    nodes
}

/// Duplicate ids, self-references and unresolved references, over every
/// concept whose id normalized.
pub fn check_concepts(
    mut acc: Accumulator,
    schema: &ExtendedSchema,
    partial: &[PartialConcept],
) -> Accumulator {
    let nodes = collect_nodes(schema, partial);
    let mut graph = ConceptGraph::default();

    for node in &nodes {
        if let Some(&first_index) = graph.nodes.get(node.id) {
            acc.record(
                Violation::new(
                    node.path.key("id"),
                    ViolationKind::DuplicateId {
                        id: node.id.to_string(),
                        first_index,
                    },
                )
                .with_value(node.id),
            );
        } else {
            graph.nodes.insert(node.id, node.index);
        }
    }
    trace!(nodes = graph.nodes.len(), "built concept graph");

    for node in &nodes {
        let deps = node.path.key("depends_on");
        for (j, target) in node.depends_on.iter().enumerate() {
            if target == node.id {
                acc.record(
                    Violation::new(
                        deps.index(j),
                        ViolationKind::SelfReference {
                            concept: node.id.to_string(),
                        },
                    )
                    .with_value(target.as_str()),
                );
            } else if !graph.contains(target) {
                acc.record(
                    Violation::new(
                        deps.index(j),
                        ViolationKind::UnresolvedReference {
                            source: node.id.to_string(),
                            target: target.clone(),
                        },
                    )
                    .with_value(target.as_str()),
                );
            }
        }
    }
    acc
}

/// Page URLs cited by concepts and examples that match neither a declared
/// page nor an entry of the parsed document. Warnings only.
pub fn check_page_references(
    mut acc: Accumulator,
    schema: &ExtendedSchema,
    doc: &Document,
) -> Accumulator {
    let known: HashSet<&str> = schema
        .page_urls()
        .chain(doc.entries().map(|e| e.url.as_str()))
        .collect();

    let cited = schema
        .concepts
        .iter()
        .map(|c| (c.path.key("related_pages"), &c.related_pages))
        .chain(
            schema
                .few_shot_examples
                .iter()
                .map(|e| (e.path.key("source_pages"), &e.source_pages)),
        );

    for (path, urls) in cited {
        for (i, url) in urls.iter().enumerate() {
            if !known.contains(url.as_str()) {
                acc.record(
                    Violation::new(path.index(i), ViolationKind::UnknownPage)
                        .with_value(url.as_str())
                        .warning(),
                );
            }
        }
    }
    acc
}
