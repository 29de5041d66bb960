//! Generated artifacts and the host-side sink that receives them

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::binding::Binding;
use crate::diagnostic::Diagnostic;

/// One generated source file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    /// File name, derived from the binding's type name
    pub name: String,

    /// Generated source text
    pub text: String,

    /// Binding the artifact was generated for
    pub binding: Binding,
}

impl Artifact {
    /// Hex-encoded SHA-256 of the generated text
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.text.as_bytes()))
    }
}

/// Summary of an emitted artifact, as it appears in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub binding: String,
    pub document: String,
    pub sha256: String,
}

impl From<&Artifact> for ArtifactRecord {
    fn from(artifact: &Artifact) -> Self {
        Self {
            name: artifact.name.clone(),
            binding: artifact.binding.qualified_name().to_string(),
            document: artifact.binding.document_key().to_string(),
            sha256: artifact.digest(),
        }
    }
}

/// Sink error types
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error writing {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Receiver of generated sources and diagnostics (the host build system)
pub trait EmissionSink {
    /// Add or overwrite the artifact called `name`
    fn add_source(&mut self, name: &str, text: &str) -> Result<(), SinkError>;

    /// Report one diagnostic
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Sink that keeps everything in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    pub sources: Vec<(String, String)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the artifact called `name`, if emitted
    pub fn source(&self, name: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }
}

impl EmissionSink for MemorySink {
    fn add_source(&mut self, name: &str, text: &str) -> Result<(), SinkError> {
        match self.sources.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = text.to_string(),
            None => self.sources.push((name.to_string(), text.to_string())),
        }
        Ok(())
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::QualifiedName;

    fn artifact(text: &str) -> Artifact {
        let binding = Binding::new(
            "schema.ttl",
            QualifiedName::new("crate", "Person"),
            "ex",
            "http://example.org/",
        )
        .unwrap();

        Artifact {
            name: "Person.g.rs".to_string(),
            text: text.to_string(),
            binding,
        }
    }

    #[test]
    fn digest_tracks_text() {
        assert_eq!(artifact("a").digest(), artifact("a").digest());
        assert_ne!(artifact("a").digest(), artifact("b").digest());
        assert_eq!(artifact("a").digest().len(), 64);
    }

    #[test]
    fn memory_sink_overwrites_by_name() {
        let mut sink = MemorySink::new();
        sink.add_source("Person.g.rs", "one").unwrap();
        sink.add_source("Person.g.rs", "two").unwrap();

        assert_eq!(sink.sources.len(), 1);
        assert_eq!(sink.source("Person.g.rs"), Some("two"));
    }

    #[test]
    fn record_names_binding() {
        let record = ArtifactRecord::from(&artifact("x"));
        assert_eq!(record.binding, "crate::Person");
        assert_eq!(record.document, "schema.ttl");
    }
}
