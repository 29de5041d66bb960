//! ttlgen core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod outcome;
pub mod binding;
pub mod schema;
pub mod sink;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticDescriptor, Severity, Location};
pub use outcome::{Outcome, Diagnostics, InvalidState};
pub use binding::{Binding, BindingError, QualifiedName, ScannedBinding};
pub use schema::{SchemaDocument, Triple, Node, JoinedUnit};
pub use sink::{Artifact, ArtifactRecord, EmissionSink, MemorySink, SinkError};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, BindingConfig, SchemaConfig, OutputConfig, SeverityThreshold, CONFIG_FILE_NAME};
