//! Emission sink writing artifacts into a directory

use std::path::{Path, PathBuf};
use ttlgen_core::{Diagnostic, EmissionSink, SinkError};

/// Writes each artifact to `<root>/<name>`
///
/// Files whose content is already current are left untouched so the host
/// build does not see a spurious modification.
pub struct DirectorySink {
    root: PathBuf,
    written: Vec<PathBuf>,
    unchanged: usize,
    diagnostics: Vec<Diagnostic>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
            unchanged: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths written during this run
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Number of artifacts that were already up to date
    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl EmissionSink for DirectorySink {
    fn add_source(&mut self, name: &str, text: &str) -> Result<(), SinkError> {
        let path = self.root.join(name);

        if std::fs::read_to_string(&path).is_ok_and(|existing| existing == text) {
            self.unchanged += 1;
            return Ok(());
        }

        let io_error = |source| SinkError::Io {
            name: name.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.root).map_err(io_error)?;
        std::fs::write(&path, text).map_err(io_error)?;

        tracing::debug!(path = %path.display(), "wrote artifact");
        self.written.push(path);
        Ok(())
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttlgen_core::DiagnosticCode;

    #[test]
    fn writes_only_changed_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src/generated");

        let mut first = DirectorySink::new(&root);
        first.add_source("Person.g.rs", "impl Person {}\n").unwrap();
        assert_eq!(first.written(), &[root.join("Person.g.rs")]);
        assert_eq!(std::fs::read_to_string(root.join("Person.g.rs")).unwrap(), "impl Person {}\n");

        let mut second = DirectorySink::new(&root);
        second.add_source("Person.g.rs", "impl Person {}\n").unwrap();
        second.add_source("Order.g.rs", "impl Order {}\n").unwrap();
        assert_eq!(second.unchanged(), 1);
        assert_eq!(second.written(), &[root.join("Order.g.rs")]);
    }

    #[test]
    fn collects_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        sink.report(&Diagnostic::new(DiagnosticCode::UnresolvedSchemaReference, ["a.ttl"]));
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
