//! Salsa inputs and tracked functions for incremental generation
//!
//! Inputs are the raw texts the host hands over; everything else is derived
//! and memoized. Diagnostics travel inside [`Outcome`] values, so a failing
//! unit never stops the others.

use std::collections::BTreeMap;
use std::path::PathBuf;
use ttlgen_codegen::{artifact_name, Generator};
use ttlgen_core::{
    Artifact, Config, Diagnostic, DiagnosticCode, JoinedUnit, Location, Binding, Outcome, SchemaDocument,
    ScannedBinding,
};
use ttlgen_scan::BindingScanner;

use crate::cancel::RevisionGuard;
use crate::output::PipelineOutput;

/// Input: Rust source file with its path and contents
#[salsa::input(debug)]
pub struct SourceFile {
    /// Path of the file, relative to the project root when discovered by the CLI
    pub path: PathBuf,

    #[returns(ref)]
    pub text: String,
}

/// Input: schema document with its path and contents
#[salsa::input(debug)]
pub struct SchemaFile {
    pub path: PathBuf,

    #[returns(ref)]
    pub text: String,
}

/// Input: the set of files taking part in one evaluation
#[salsa::input(debug)]
pub struct Workspace {
    #[returns(ref)]
    pub sources: Vec<SourceFile>,

    /// Candidate schema documents; files without the configured extension are
    /// ignored
    #[returns(ref)]
    pub schemas: Vec<SchemaFile>,
}

/// Input: Configuration
///
/// Changes when ttlgen.toml is modified.
#[salsa::input(debug)]
pub struct ConfigInput {
    #[returns(ref)]
    pub config: Config,
}

/// Schema documents by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaIndex {
    /// Keys provided by exactly one file
    pub documents: BTreeMap<String, SchemaFile>,

    /// Keys provided by several files, with every providing path
    pub duplicates: BTreeMap<String, Vec<PathBuf>>,
}

/// Create the inputs for a set of in-memory files
pub fn new_workspace(
    db: &dyn salsa::Database,
    sources: impl IntoIterator<Item = (PathBuf, String)>,
    schemas: impl IntoIterator<Item = (PathBuf, String)>,
) -> Workspace {
    let sources = sources
        .into_iter()
        .map(|(path, text)| SourceFile::new(db, path, text))
        .collect();
    let schemas = schemas
        .into_iter()
        .map(|(path, text)| SchemaFile::new(db, path, text))
        .collect();

    Workspace::new(db, sources, schemas)
}

/// Tracked function: Parse one schema document
///
/// Depends on that document alone.
#[salsa::tracked]
pub fn load_schema(db: &dyn salsa::Database, file: SchemaFile) -> Outcome<SchemaDocument> {
    let path = file.path(db);
    let key = ttlgen_schema::document_key(&path).unwrap_or_else(|| path.display().to_string());

    ttlgen_schema::load(file.text(db), &key)
        .map_diagnostics(|d| d.with_location_if_absent(Location::new(path.display().to_string())))
}

/// Tracked function: Index schema documents by key
///
/// Reads paths only, so editing a document's text never invalidates the index.
#[salsa::tracked]
pub fn schema_index(db: &dyn salsa::Database, workspace: Workspace, config: ConfigInput) -> SchemaIndex {
    let extension = &config.config(db).schema.extension;

    let mut by_key: BTreeMap<String, Vec<SchemaFile>> = BTreeMap::new();
    for file in workspace.schemas(db) {
        let path = file.path(db);
        if !ttlgen_schema::is_schema_file(&path, extension) {
            continue;
        }
        if let Some(key) = ttlgen_schema::document_key(&path) {
            by_key.entry(key).or_default().push(*file);
        }
    }

    let mut index = SchemaIndex::default();
    for (key, files) in by_key {
        match files.as_slice() {
            [file] => {
                index.documents.insert(key, *file);
            }
            files => {
                let mut paths: Vec<PathBuf> = files.iter().map(|file| file.path(db)).collect();
                paths.sort();
                index.duplicates.insert(key, paths);
            }
        }
    }

    index
}

/// Tracked function: Scan every declaration of one source file
///
/// Recomputed when the file or the configuration changes. The scan checks for
/// revision cancellation between annotations.
#[salsa::tracked]
pub fn scan_source(db: &dyn salsa::Database, file: SourceFile, config: ConfigInput) -> Vec<Outcome<ScannedBinding>> {
    let config = config.config(db);
    let path = file.path(db);

    let source_root = if path.is_absolute() {
        config.resolve(&config.binding.source_root)
    } else {
        config.binding.source_root.clone()
    };

    let scanner = BindingScanner::new(config.binding.annotation.clone());
    match ttlgen_scan::scan_source(&scanner, &path, file.text(db), &source_root, &RevisionGuard::new(db)) {
        Ok(outcomes) => outcomes,
        Err(never) => match never {},
    }
}

/// Tracked function: Pair a binding with the schema document it references
///
/// Depends on the index and on the referenced document only.
#[salsa::tracked]
pub fn join_binding(
    db: &dyn salsa::Database,
    workspace: Workspace,
    config: ConfigInput,
    binding: Binding,
) -> Outcome<JoinedUnit> {
    let index = schema_index(db, workspace, config);
    let key = binding.document_key();

    if index.duplicates.contains_key(key) {
        return Diagnostic::new(DiagnosticCode::AmbiguousSchemaReference, [key]).into();
    }

    let Some(file) = index.documents.get(key) else {
        return Diagnostic::new(DiagnosticCode::UnresolvedSchemaReference, [key]).into();
    };

    // The parse error itself is reported once, against the document
    match load_schema(db, *file) {
        Outcome::Ok(schema) => Outcome::ok(JoinedUnit { binding, schema }),
        Outcome::Err(_) => Diagnostic::new(DiagnosticCode::UnresolvedSchemaReference, [key]).into(),
    }
}

/// Tracked function: Generate the artifact for one binding
#[salsa::tracked]
pub fn generate_binding(
    db: &dyn salsa::Database,
    workspace: Workspace,
    config: ConfigInput,
    binding: Binding,
) -> Outcome<Artifact> {
    let suffix = &config.config(db).output.artifact_suffix;

    join_binding(db, workspace, config, binding).and_then(|unit| {
        let name = artifact_name(&unit.binding, suffix);
        Generator::new()
            .generate(&unit.binding, &unit.schema)
            .map(|text| Artifact {
                name,
                text,
                binding: unit.binding,
            })
    })
}

/// Tracked function: Run the whole pipeline over a workspace
///
/// The result does not depend on the order of the workspace's files:
/// artifacts are keyed by name and diagnostics are sorted.
#[salsa::tracked]
pub fn pipeline(db: &dyn salsa::Database, workspace: Workspace, config: ConfigInput) -> PipelineOutput {
    let index = schema_index(db, workspace, config);
    let mut diagnostics = Vec::new();

    for (key, paths) in &index.duplicates {
        let paths = paths
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>();
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::DuplicateSchemaKey,
            [key.clone(), paths.join(", ")],
        ));
    }

    for file in index.documents.values() {
        diagnostics.extend(load_schema(db, *file).diagnostics().iter().cloned());
    }

    // artifact name -> every binding producing it
    let mut candidates: BTreeMap<String, Vec<(Artifact, Option<Location>)>> = BTreeMap::new();

    for source in workspace.sources(db) {
        for scanned in scan_source(db, *source, config) {
            let ScannedBinding { binding, location } = match scanned {
                Outcome::Ok(scanned) => scanned,
                Outcome::Err(failed) => {
                    diagnostics.extend(failed);
                    continue;
                }
            };

            match generate_binding(db, workspace, config, binding) {
                Outcome::Ok(artifact) => {
                    candidates
                        .entry(artifact.name.clone())
                        .or_default()
                        .push((artifact, location));
                }
                Outcome::Err(failed) => {
                    diagnostics.extend(failed.into_iter().map(|d| match &location {
                        Some(location) => d.with_location_if_absent(location.clone()),
                        None => d,
                    }));
                }
            }
        }
    }

    let mut artifacts = BTreeMap::new();
    for (name, mut producers) in candidates {
        if producers.len() == 1 {
            if let Some((artifact, _)) = producers.pop() {
                artifacts.insert(name, artifact);
            }
            continue;
        }

        let mut bindings: Vec<String> = producers
            .iter()
            .map(|(artifact, _)| artifact.binding.qualified_name().to_string())
            .collect();
        bindings.sort();
        let bindings = bindings.join(", ");

        for (_, location) in producers {
            let diagnostic = Diagnostic::new(DiagnosticCode::DuplicateArtifactName, [name.clone(), bindings.clone()]);
            diagnostics.push(match location {
                Some(location) => diagnostic.with_location(location),
                None => diagnostic,
            });
        }
    }

    let config = config.config(db);
    let mut diagnostics: Vec<Diagnostic> = diagnostics
        .into_iter()
        .map(|d| config.severity.apply(d))
        .collect();
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    tracing::debug!(
        artifacts = artifacts.len(),
        diagnostics = diagnostics.len(),
        "pipeline evaluated"
    );

    PipelineOutput { artifacts, diagnostics }
}
