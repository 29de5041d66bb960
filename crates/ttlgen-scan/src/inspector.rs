//! Host semantic layer
//!
//! The scanner never touches a concrete syntax tree. Everything it needs to
//! know about a declaration goes through [`DeclarationInspector`].

use ttlgen_core::{Location, QualifiedName};

/// One positional argument of an annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationArgument {
    /// Compile-time literal, rendered as its value
    Literal(String),

    /// Anything else, rendered as written
    Expression(String),
}

impl AnnotationArgument {
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Expression(_) => None,
        }
    }
}

/// Read-only view of declarations exposed by a host frontend
pub trait DeclarationInspector {
    type Declaration;

    /// Fully-qualified names of the annotations applied to `declaration`, in
    /// source order
    fn annotation_names(&self, declaration: &Self::Declaration) -> Vec<String>;

    /// Positional arguments of the `index`-th annotation
    fn annotation_arguments(&self, declaration: &Self::Declaration, index: usize) -> Vec<AnnotationArgument>;

    /// Arguments of the first annotation named `annotation_type_name`
    fn find_annotation_arguments(
        &self,
        declaration: &Self::Declaration,
        annotation_type_name: &str,
    ) -> Option<Vec<AnnotationArgument>> {
        self.annotation_names(declaration)
            .iter()
            .position(|name| name == annotation_type_name)
            .map(|index| self.annotation_arguments(declaration, index))
    }

    /// Namespace and simple name, or `None` when the host cannot resolve them
    fn resolve_qualified_name(&self, declaration: &Self::Declaration) -> Option<QualifiedName>;

    /// Name as written in source, if the declaration has one
    fn written_name(&self, declaration: &Self::Declaration) -> Option<String>;

    /// Whether the declaration introduces a type
    fn is_type_declaration(&self, declaration: &Self::Declaration) -> bool;

    fn location(&self, declaration: &Self::Declaration) -> Option<Location>;
}
