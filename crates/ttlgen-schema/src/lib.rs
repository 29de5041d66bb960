//! Schema document loading
//!
//! This crate handles:
//! - Recognising schema documents by file extension
//! - Keying documents by file name
//! - Parsing Turtle text into a [`SchemaDocument`](ttlgen_core::SchemaDocument)
//!
//! Parsing is delegated to `oxttl`; this crate only keys the result and turns
//! parser errors into diagnostics.

pub mod loader;

pub use loader::{load, is_schema_file, document_key};
