//! Incremental generation pipeline using Salsa
//!
//! Source files, schema documents and the configuration are Salsa inputs.
//! Every stage of the pipeline is a tracked function, so after an edit only
//! the units whose inputs changed are recomputed:
//!
//! - **Schemas**: `load_schema` per document, `schema_index` over file names
//! - **Bindings**: `scan_source` per source file
//! - **Generation**: `join_binding` and `generate_binding` per binding
//! - **Aggregation**: `pipeline`, yielding a [`PipelineOutput`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ttlgen_incremental::{queries, TtlgenDatabase};
//!
//! let db = TtlgenDatabase::default();
//! let workspace = queries::new_workspace(&db, sources, schemas);
//! let config = queries::ConfigInput::new(&db, config);
//!
//! let output = queries::pipeline(&db, workspace, config);
//! output.emit(&mut sink)?;
//! ```

pub mod cancel;
pub mod db;
pub mod output;
pub mod queries;

pub use cancel::RevisionGuard;
pub use db::TtlgenDatabase;
pub use output::PipelineOutput;
pub use queries::{ConfigInput, SchemaFile, SchemaIndex, SourceFile, Workspace};
