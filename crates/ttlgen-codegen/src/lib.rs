//! Source generation for schema bindings
//!
//! This crate handles:
//! - Selecting the schema terms that live under a binding's prefix URI
//! - Mapping term local names onto Rust constant names
//! - Rendering the generated `impl` block through a minijinja template

pub mod generator;
pub mod names;

pub use generator::{artifact_name, Generator, RDFS_COMMENT, RDFS_LABEL};
pub use names::constant_name;
