//! Rendering of generated artifacts

use minijinja::Environment;
use serde::Serialize;
use std::collections::BTreeMap;
use ttlgen_core::{Binding, Diagnostic, DiagnosticCode, Diagnostics, Outcome, SchemaDocument};

use crate::names::constant_name;

pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

const ARTIFACT_TEMPLATE: &str = include_str!("../templates/artifact.rs.jinja");

/// Constants emitted for every binding; terms may not map onto them
const RESERVED_NAMES: [&str; 2] = ["PREFIX", "PREFIX_URI"];

/// Name of the artifact generated for `binding`
///
/// A raw identifier such as `r#type` names its file without the `r#`.
pub fn artifact_name(binding: &Binding, suffix: &str) -> String {
    let type_name = binding.type_name();
    format!("{}{}", type_name.strip_prefix("r#").unwrap_or(type_name), suffix)
}

#[derive(Debug, Serialize)]
struct Term<'a> {
    name: String,
    iri: &'a str,
    doc: Option<String>,
}

#[derive(Debug, Serialize)]
struct ArtifactContext<'a> {
    document: &'a str,
    type_name: &'a str,
    prefix: &'a str,
    prefix_uri: &'a str,
    terms: Vec<Term<'a>>,
}

/// Renders one binding against its schema document
pub struct Generator {
    env: Environment<'static>,
}

impl Generator {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        // Debug formatting of a str is a valid Rust string literal
        env.add_filter("rust_str", |value: String| format!("{value:?}"));

        Self { env }
    }

    /// Generate the source text for `binding`
    ///
    /// Pure: the same binding and schema always render the same text. Terms
    /// are the IRIs of `schema` strictly under the binding's prefix URI.
    pub fn generate(&self, binding: &Binding, schema: &SchemaDocument) -> Outcome<String> {
        let prefix_uri = binding.prefix_uri();

        // constant name -> every IRI that maps onto it
        let mut by_name: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for iri in schema.iris() {
            let Some(local) = iri.strip_prefix(prefix_uri) else {
                continue;
            };
            match constant_name(local) {
                Some(name) => by_name.entry(name).or_default().push(iri),
                None => tracing::debug!(iri, "schema term has no usable constant name"),
            }
        }

        let conflicts: Vec<Diagnostic> = by_name
            .iter()
            .filter(|(name, iris)| iris.len() > 1 || RESERVED_NAMES.contains(&name.as_str()))
            .map(|(name, iris)| Diagnostic::new(DiagnosticCode::ConflictingTermName, [name.clone(), iris.join(", ")]))
            .collect();
        if let Some(diagnostics) = Diagnostics::from_vec(conflicts) {
            return Outcome::err(diagnostics);
        }

        let terms = by_name
            .into_iter()
            .filter_map(|(name, iris)| {
                let iri = iris.into_iter().next()?;
                Some(Term {
                    doc: documentation(schema, iri),
                    name,
                    iri,
                })
            })
            .collect();

        let context = ArtifactContext {
            document: binding.document_key(),
            type_name: binding.type_name(),
            prefix: binding.preferred_prefix(),
            prefix_uri,
            terms,
        };

        match self.env.render_str(ARTIFACT_TEMPLATE, &context) {
            Ok(text) => Outcome::ok(text),
            Err(e) => Diagnostic::new(
                DiagnosticCode::TemplateError,
                [binding.qualified_name().to_string(), e.to_string()],
            )
            .into(),
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// First `rdfs:comment`, else first `rdfs:label`, on one line
fn documentation(schema: &SchemaDocument, iri: &str) -> Option<String> {
    schema
        .literals(iri, RDFS_COMMENT)
        .chain(schema.literals(iri, RDFS_LABEL))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ttlgen_core::{Node, QualifiedName, Triple};

    const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";

    fn binding(prefix_uri: &str) -> Binding {
        Binding::new("person.ttl", QualifiedName::new("crate::model", "Person"), "ex", prefix_uri).unwrap()
    }

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

    fn person_schema() -> SchemaDocument {
        SchemaDocument::new(
            "person.ttl",
            vec![
                Triple::new(iri("http://example.org/Person"), RDF_TYPE, iri(RDFS_CLASS)),
                Triple::new(iri("http://example.org/Person"), RDFS_LABEL, text("Person")),
                Triple::new(iri("http://example.org/Person"), RDFS_COMMENT, text("A human\n  being.")),
                Triple::new(iri("http://example.org/givenName"), RDFS_LABEL, text("given name")),
                Triple::new(iri("http://example.org/givenName"), "http://example.org/range", iri(RDFS_CLASS)),
            ],
        )
    }

    #[test]
    fn renders_constants_under_prefix() {
        let outcome = Generator::new().generate(&binding("http://example.org/"), &person_schema());

        let expected = r#"// @generated by ttlgen from person.ttl. Do not edit.

impl Person {
    /// Preferred prefix for terms of `person.ttl`
    pub const PREFIX: &'static str = "ex";

    /// Namespace shared by the terms below
    pub const PREFIX_URI: &'static str = "http://example.org/";

    /// given name
    pub const GIVEN_NAME: &'static str = "http://example.org/givenName";

    /// A human being.
    pub const PERSON: &'static str = "http://example.org/Person";

    pub const RANGE: &'static str = "http://example.org/range";
}
"#;
        assert_eq!(outcome.value().unwrap(), expected);
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = Generator::new();
        let schema = person_schema();
        let first = generator.generate(&binding("http://example.org/"), &schema);
        let second = Generator::default().generate(&binding("http://example.org/"), &schema);
        assert_eq!(first, second);
    }

    #[test]
    fn unrelated_prefix_has_no_terms() {
        let outcome = Generator::new().generate(&binding("http://other.example/"), &person_schema());
        let text = outcome.value().unwrap();
        assert!(text.contains("pub const PREFIX_URI: &'static str = \"http://other.example/\";"));
        assert!(!text.contains("PERSON"));
    }

    #[test]
    fn prefix_uri_is_matched_as_written() {
        let schema = SchemaDocument::new(
            "person.ttl",
            vec![Triple::new(iri("http://Example.org/Person"), RDF_TYPE, iri(RDFS_CLASS))],
        );

        let text = Generator::new().generate(&binding("http://Example.org/"), &schema).value().unwrap().clone();
        assert!(text.contains("pub const PREFIX_URI: &'static str = \"http://Example.org/\";"));
        assert!(text.contains("pub const PERSON: &'static str = \"http://Example.org/Person\";"));

        // Without the trailing slash the local names keep their leading `/`.
        let text = Generator::new().generate(&binding("http://Example.org"), &schema).value().unwrap().clone();
        assert!(text.contains("pub const PREFIX_URI: &'static str = \"http://Example.org\";"));
    }

    #[test]
    fn colliding_terms_are_diagnosed() {
        let schema = SchemaDocument::new(
            "person.ttl",
            vec![
                Triple::new(iri("http://example.org/givenName"), RDF_TYPE, iri(RDFS_CLASS)),
                Triple::new(iri("http://example.org/given-name"), RDF_TYPE, iri(RDFS_CLASS)),
                Triple::new(iri("http://example.org/prefix"), RDF_TYPE, iri(RDFS_CLASS)),
            ],
        );

        let outcome = Generator::new().generate(&binding("http://example.org/"), &schema);
        let diagnostics = outcome.diagnostics();

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.code == DiagnosticCode::ConflictingTermName));
        assert_eq!(diagnostics[0].args[0], "GIVEN_NAME");
        assert_eq!(
            diagnostics[0].args[1],
            "http://example.org/given-name, http://example.org/givenName"
        );
        assert_eq!(diagnostics[1].args[0], "PREFIX");
    }

    #[test]
    fn string_literals_are_escaped() {
        let b = Binding::new(
            "q.ttl",
            QualifiedName::new("crate", "Quoted"),
            "say \"hi\"",
            "http://example.org/",
        )
        .unwrap();
        let outcome = Generator::new().generate(&b, &SchemaDocument::new("q.ttl", Vec::new()));
        assert!(outcome.value().unwrap().contains(r#"pub const PREFIX: &'static str = "say \"hi\"";"#));
    }

    #[test]
    fn artifact_is_named_after_type() {
        assert_eq!(artifact_name(&binding("http://example.org/"), ".g.rs"), "Person.g.rs");
    }

    #[test]
    fn raw_type_name_stays_raw_in_source() {
        let b = Binding::new("t.ttl", QualifiedName::new("crate", "r#type"), "t", "http://example.org/").unwrap();
        let text = Generator::new().generate(&b, &SchemaDocument::new("t.ttl", Vec::new())).value().unwrap().clone();

        assert!(text.contains("impl r#type {"));
        assert_eq!(artifact_name(&b, ".g.rs"), "type.g.rs");
    }
}
