//! Binding discovery
//!
//! This crate handles:
//! - The [`DeclarationInspector`] capability the scanner is written against
//! - Validating binding annotations into [`Binding`](ttlgen_core::Binding)s
//! - Cooperative cancellation of long scans
//! - A `syn`-based inspector for Rust source files

pub mod inspector;
pub mod cancel;
pub mod scanner;
pub mod syntax;

pub use inspector::{AnnotationArgument, DeclarationInspector};
pub use cancel::{Cancellation, CancelFlag, Cancelled, NeverCancel};
pub use scanner::{BindingScanner, REQUIRED_ARGUMENTS};
pub use syntax::{scan_source, ParsedSource, SourceDeclaration, ItemKind};
