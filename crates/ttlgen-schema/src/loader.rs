//! Turtle parsing using oxttl
//!
//! Parses schema text into a triple set and reports failures as diagnostics.

use oxrdf::{Subject, Term};
use oxttl::TurtleParser;
use std::collections::HashMap;
use std::path::Path;
use ttlgen_core::{Diagnostic, DiagnosticCode, Node, Outcome, SchemaDocument, Triple};

/// Parse `document_text` as Turtle and key the result by `document_key`
///
/// The first syntax error aborts the document; a partially parsed graph is
/// never returned. Blank nodes are relabeled `b0`, `b1`, ... in order of
/// first appearance, so the same text always yields an equal document.
pub fn load(document_text: &str, document_key: &str) -> Outcome<SchemaDocument> {
    let mut triples = Vec::new();
    let mut blank_labels = BlankLabels::default();

    for parsed in TurtleParser::new().for_slice(document_text.as_bytes()) {
        match parsed {
            Ok(triple) => triples.push(convert_triple(triple, &mut blank_labels)),
            Err(e) => {
                tracing::debug!(document = document_key, error = %e, "schema document failed to parse");
                return Diagnostic::new(
                    DiagnosticCode::SchemaParseError,
                    [document_key.to_string(), e.to_string()],
                )
                .into();
            }
        }
    }

    Outcome::ok(SchemaDocument::new(document_key, triples))
}

/// Whether `path` names a schema document (extension compared case-insensitively)
pub fn is_schema_file(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Document key of a schema file: its file name
pub fn document_key(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

/// Parser-assigned blank node id -> document-local label
#[derive(Default)]
struct BlankLabels(HashMap<String, String>);

impl BlankLabels {
    fn label(&mut self, id: &str) -> Node {
        let next = self.0.len();
        let label = self
            .0
            .entry(id.to_string())
            .or_insert_with(|| format!("b{next}"));
        Node::Blank(label.clone())
    }
}

fn convert_triple(triple: oxrdf::Triple, blank_labels: &mut BlankLabels) -> Triple {
    let subject = match triple.subject {
        Subject::NamedNode(node) => Node::Iri(node.into_string()),
        Subject::BlankNode(node) => blank_labels.label(node.as_str()),
        #[allow(unreachable_patterns)]
        other => blank_labels.label(&other.to_string()),
    };

    let object = match triple.object {
        Term::NamedNode(node) => Node::Iri(node.into_string()),
        Term::BlankNode(node) => blank_labels.label(node.as_str()),
        Term::Literal(literal) => Node::Literal {
            value: literal.value().to_string(),
            datatype: literal.datatype().as_str().to_string(),
            language: literal.language().map(str::to_string),
        },
        #[allow(unreachable_patterns)]
        other => blank_labels.label(&other.to_string()),
    };

    Triple::new(subject, triple.predicate.into_string(), object)
}
