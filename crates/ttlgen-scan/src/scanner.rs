//! Binding annotation validation
//!
//! Turns one declaration into nothing (not annotated), a [`ScannedBinding`],
//! or the diagnostics explaining why the annotation is unusable.

use ttlgen_core::{Binding, Diagnostic, DiagnosticCode, Outcome, ScannedBinding};

use crate::cancel::Cancellation;
use crate::inspector::{AnnotationArgument, DeclarationInspector};

/// Document key, preferred prefix, prefix URI
pub const REQUIRED_ARGUMENTS: usize = 3;

/// Scanner for one configured annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingScanner {
    annotation: String,
}

impl BindingScanner {
    /// `annotation` is the fully-qualified annotation path, e.g. `ttlgen::from_ttl`
    pub fn new(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
        }
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    /// Scan one declaration
    ///
    /// Returns `Ok(None)` when the declaration does not carry the annotation.
    /// Every annotation is inspected: a declaration carrying the binding
    /// annotation more than once is rejected rather than bound by the first.
    /// The cancellation signal is checked before each annotation is
    /// inspected; a cancelled scan returns the interrupt and nothing else.
    pub fn scan<I, C>(
        &self,
        inspector: &I,
        declaration: &I::Declaration,
        cancellation: &C,
    ) -> Result<Option<Outcome<ScannedBinding>>, C::Interrupt>
    where
        I: DeclarationInspector + ?Sized,
        C: Cancellation + ?Sized,
    {
        let mut matches = Vec::new();
        for (index, name) in inspector.annotation_names(declaration).iter().enumerate() {
            cancellation.checkpoint()?;
            if *name == self.annotation {
                matches.push(index);
            }
        }

        if matches.is_empty() {
            return Ok(None);
        }

        let location = inspector.location(declaration);
        let outcome = self
            .build(inspector, declaration, &matches)
            .map(|binding| ScannedBinding {
                binding,
                location: location.clone(),
            });

        Ok(Some(match location {
            Some(location) => outcome.map_diagnostics(|d| d.with_location_if_absent(location.clone())),
            None => outcome,
        }))
    }

    fn build<I>(&self, inspector: &I, declaration: &I::Declaration, matches: &[usize]) -> Outcome<Binding>
    where
        I: DeclarationInspector + ?Sized,
    {
        let written = inspector
            .written_name(declaration)
            .unwrap_or_else(|| "<unnamed>".to_string());

        if !inspector.is_type_declaration(declaration) {
            return Diagnostic::new(DiagnosticCode::NotADeclaration, [written]).into();
        }

        let &[index] = matches else {
            let reason = format!("`{}` is applied {} times", self.annotation, matches.len());
            return Diagnostic::new(DiagnosticCode::InvalidBindingArgument, [written, reason]).into();
        };

        let arguments = inspector.annotation_arguments(declaration, index);
        let literals: Vec<&str> = arguments.iter().filter_map(AnnotationArgument::literal).collect();

        if literals.len() < REQUIRED_ARGUMENTS {
            return Diagnostic::new(DiagnosticCode::IncorrectArgumentCount, [literals.len().to_string()]).into();
        }

        let non_literal = arguments.iter().enumerate().find_map(|(position, argument)| match argument {
            AnnotationArgument::Expression(text) => Some((position + 1, text)),
            AnnotationArgument::Literal(_) => None,
        });
        if let Some((position, text)) = non_literal {
            return Diagnostic::new(DiagnosticCode::NonLiteralArgument, [position.to_string(), text.clone()]).into();
        }

        if arguments.len() != REQUIRED_ARGUMENTS {
            return Diagnostic::new(DiagnosticCode::IncorrectArgumentCount, [arguments.len().to_string()]).into();
        }

        let Some(name) = inspector.resolve_qualified_name(declaration) else {
            return Diagnostic::new(DiagnosticCode::UnresolvableDeclaration, [written]).into();
        };

        Binding::new(literals[0], name, literals[1], literals[2])
            .map_err(|e| Diagnostic::new(DiagnosticCode::InvalidBindingArgument, [written, e.to_string()]))
            .into()
    }
}
