//! Result of one pipeline evaluation

use std::collections::BTreeMap;
use ttlgen_core::{Artifact, ArtifactRecord, Diagnostic, EmissionSink, Report, Severity, SinkError};

/// Artifacts and diagnostics of one pipeline evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Generated artifacts by name
    pub artifacts: BTreeMap<String, Artifact>,

    /// Every diagnostic, sorted by location then code
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineOutput {
    /// Hand every diagnostic, then every artifact, to `sink`
    ///
    /// Diagnostics are delivered regardless of storage failures. An artifact
    /// the sink fails to store does not stop the others; the first failure is
    /// returned once all have been offered.
    pub fn emit(&self, sink: &mut dyn EmissionSink) -> Result<(), SinkError> {
        for diagnostic in &self.diagnostics {
            sink.report(diagnostic);
        }

        let mut first_error = None;
        for artifact in self.artifacts.values() {
            if let Err(e) = sink.add_source(&artifact.name, &artifact.text) {
                tracing::warn!(artifact = %artifact.name, error = %e, "failed to store artifact");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Build a machine-readable report of this evaluation
    pub fn report(&self) -> Report {
        Report::from_parts(
            self.diagnostics.clone(),
            self.artifacts.values().map(ArtifactRecord::from).collect(),
        )
    }
}
