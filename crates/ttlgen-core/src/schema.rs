//! In-memory schema graphs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::binding::Binding;

/// RDF node in subject or object position
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Node {
    /// Absolute IRI
    Iri(String),

    /// Blank node label (document-local)
    Blank(String),

    /// Literal with datatype IRI and optional language tag
    Literal {
        value: String,
        datatype: String,
        language: Option<String>,
    },
}

impl Node {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: String,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: impl Into<String>, object: Node) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// Parsed schema document, keyed by its file name
///
/// Triples are kept ordered so that two parses of the same text compare
/// equal and iterate identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaDocument {
    key: String,
    triples: BTreeSet<Triple>,
}

impl SchemaDocument {
    pub fn new(key: impl Into<String>, triples: impl IntoIterator<Item = Triple>) -> Self {
        Self {
            key: key.into(),
            triples: triples.into_iter().collect(),
        }
    }

    /// Document key (file name)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn triples(&self) -> &BTreeSet<Triple> {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Every IRI mentioned in subject, predicate or object position
    pub fn iris(&self) -> BTreeSet<&str> {
        let mut iris = BTreeSet::new();
        for triple in &self.triples {
            iris.extend(triple.subject.as_iri());
            iris.insert(triple.predicate.as_str());
            iris.extend(triple.object.as_iri());
        }
        iris
    }

    /// Literal objects of `(subject, predicate, _)`, in order
    pub fn literals<'a>(&'a self, subject: &'a str, predicate: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject.as_iri() == Some(subject) && t.predicate == predicate)
            .filter_map(|t| t.object.as_literal())
    }
}

/// A binding paired with the schema document it references
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinedUnit {
    pub binding: Binding,
    pub schema: SchemaDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    fn iri(s: &str) -> Node {
        Node::Iri(s.to_string())
    }

    fn text(s: &str) -> Node {
        Node::Literal {
            value: s.to_string(),
            datatype: "http://www.w3.org/2001/XMLSchema#string".to_string(),
            language: None,
        }
    }

    #[test]
    fn triple_order_does_not_matter() {
        let a = Triple::new(iri("http://example.org/A"), RDFS_LABEL, text("A"));
        let b = Triple::new(iri("http://example.org/B"), RDFS_LABEL, text("B"));

        let first = SchemaDocument::new("s.ttl", vec![a.clone(), b.clone()]);
        let second = SchemaDocument::new("s.ttl", vec![b, a]);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn collects_iris_and_literals() {
        let doc = SchemaDocument::new(
            "s.ttl",
            vec![
                Triple::new(iri("http://example.org/A"), RDFS_LABEL, text("Thing A")),
                Triple::new(iri("http://example.org/A"), "http://example.org/rel", iri("http://example.org/B")),
                Triple::new(Node::Blank("b0".into()), RDFS_LABEL, text("anon")),
            ],
        );

        let iris: Vec<&str> = doc.iris().into_iter().collect();
        assert_eq!(
            iris,
            vec![
                "http://example.org/A",
                "http://example.org/B",
                "http://example.org/rel",
                RDFS_LABEL,
            ]
        );

        let labels: Vec<&str> = doc.literals("http://example.org/A", RDFS_LABEL).collect();
        assert_eq!(labels, vec!["Thing A"]);
    }
}
