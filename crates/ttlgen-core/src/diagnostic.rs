//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names and new ids only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic code registry (v1)
///
/// Every code maps to exactly one entry of the static descriptor table,
/// which holds its id, string code, title, message template and default
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    // Declaration scanning (00xx)
    /// Binding annotation applied to something that is not a type declaration
    NotADeclaration,

    /// Binding annotation has the wrong number of arguments
    IncorrectArgumentCount,

    /// The annotated declaration's qualified name cannot be resolved
    UnresolvableDeclaration,

    // Schema resolution
    /// No loaded schema document under the referenced key
    UnresolvedSchemaReference,

    /// Schema document failed to parse
    SchemaParseError,

    // Declaration scanning, continued
    /// Binding annotation argument is not a literal
    NonLiteralArgument,

    /// Binding annotation arguments are literals but violate the binding invariants
    InvalidBindingArgument,

    // Schema indexing
    /// More than one schema file has the same document key
    DuplicateSchemaKey,

    /// A binding references a duplicated document key
    AmbiguousSchemaReference,

    // Generation
    /// Two bindings produce the same artifact name
    DuplicateArtifactName,

    /// Two schema terms map to the same generated constant
    ConflictingTermName,

    /// Source file failed to parse
    SourceParseError,

    /// Generated source could not be rendered
    TemplateError,
}

/// Fixed metadata for one diagnostic code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    /// Stable numeric id (e.g. "TTL0002")
    pub id: &'static str,

    /// Stable string code (e.g. "incorrect-argument-count")
    pub code: &'static str,

    /// Short title
    pub title: &'static str,

    /// Message template; `{0}`, `{1}`, ... are replaced by message arguments
    pub template: &'static str,

    /// Default severity (can be overridden by configuration)
    pub severity: Severity,
}

/// Indexed by `DiagnosticCode as usize`.
static DESCRIPTORS: [DiagnosticDescriptor; 13] = [
    DiagnosticDescriptor {
        id: "TTL0001",
        code: "not-a-declaration",
        title: "Not a type declaration",
        template: "`{0}` is not a type declaration; schema bindings apply to structs, enums and unions.",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0002",
        code: "incorrect-argument-count",
        title: "Incorrect number of arguments to schema binding",
        template: "Incorrect number of arguments to schema binding annotation. ({0}!=3)",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0003",
        code: "unresolvable-declaration",
        title: "Cannot resolve declared type",
        template: "Cannot resolve declared type {0}.",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0004",
        code: "unresolved-schema-reference",
        title: "Cannot find linked schema document",
        template: "Cannot find linked schema document {0}.",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0005",
        code: "schema-parse-error",
        title: "Schema document failed to parse",
        template: "Schema document {0} failed to parse: {1}",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0006",
        code: "non-literal-argument",
        title: "Schema binding argument is not a literal",
        template: "Argument {0} of schema binding annotation must be a literal, found `{1}`.",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0007",
        code: "invalid-binding-argument",
        title: "Invalid schema binding argument",
        template: "Invalid schema binding on {0}: {1}",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0008",
        code: "duplicate-schema-key",
        title: "Duplicate schema document key",
        template: "Schema document key {0} is provided by more than one file: {1}",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0009",
        code: "ambiguous-schema-reference",
        title: "Ambiguous schema document reference",
        template: "Schema document {0} is ambiguous: more than one file has that name.",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0010",
        code: "duplicate-artifact-name",
        title: "Duplicate generated artifact name",
        template: "Generated artifact {0} would be produced by more than one declaration: {1}",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0011",
        code: "conflicting-term-name",
        title: "Schema terms map to the same constant",
        template: "Schema terms {1} all map to the constant {0}.",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0012",
        code: "source-parse-error",
        title: "Source file failed to parse",
        template: "Source file {0} failed to parse: {1}",
        severity: Severity::Error,
    },
    DiagnosticDescriptor {
        id: "TTL0013",
        code: "template-error",
        title: "Failed to render generated source",
        template: "Failed to render generated source for {0}: {1}",
        severity: Severity::Error,
    },
];

impl DiagnosticCode {
    /// All codes, in id order
    pub const ALL: [DiagnosticCode; 13] = [
        Self::NotADeclaration,
        Self::IncorrectArgumentCount,
        Self::UnresolvableDeclaration,
        Self::UnresolvedSchemaReference,
        Self::SchemaParseError,
        Self::NonLiteralArgument,
        Self::InvalidBindingArgument,
        Self::DuplicateSchemaKey,
        Self::AmbiguousSchemaReference,
        Self::DuplicateArtifactName,
        Self::ConflictingTermName,
        Self::SourceParseError,
        Self::TemplateError,
    ];

    /// Descriptor for this code
    pub fn descriptor(self) -> &'static DiagnosticDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(self) -> &'static str {
        self.descriptor().code
    }

    /// Stable numeric id, e.g. "TTL0004"
    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    /// Look up a code by its string form
    pub fn from_str_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue that should fail the build
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location in a file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root
    pub file: String,

    /// Optional line number (1-indexed)
    pub line: Option<usize>,

    /// Optional column number (1-indexed)
    pub column: Option<usize>,
}

impl Location {
    /// Create a new location with just a file path
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
        }
    }

    /// Create a location with file, line, and column
    pub fn with_position(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        Ok(())
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Message rendered from the code's template and `args`
    pub message: String,

    /// Message arguments, in template order
    pub args: Vec<String>,

    /// Source location (best-effort)
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity, rendering its template
    pub fn new<I, S>(code: DiagnosticCode, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let descriptor = code.descriptor();

        Self {
            code,
            severity: descriptor.severity,
            message: render_template(descriptor.template, &args),
            args,
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the location unless one is already present
    pub fn with_location_if_absent(mut self, location: Location) -> Self {
        if self.location.is_none() {
            self.location = Some(location);
        }
        self
    }

    /// Override the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Ordering used when diagnostics are reported as a set
    pub fn sort_key(&self) -> (Option<&Location>, DiagnosticCode, &str) {
        (self.location.as_ref(), self.code, self.message.as_str())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}", self.severity, self.code.id(), self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {})", location)?;
        }
        Ok(())
    }
}

/// Replace `{N}` placeholders with `args[N]` in a single pass.
///
/// Placeholders without a matching argument are kept verbatim.
fn render_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::NotADeclaration.as_str(), "not-a-declaration");
        assert_eq!(DiagnosticCode::IncorrectArgumentCount.as_str(), "incorrect-argument-count");
        assert_eq!(DiagnosticCode::UnresolvableDeclaration.as_str(), "unresolvable-declaration");
        assert_eq!(DiagnosticCode::UnresolvedSchemaReference.as_str(), "unresolved-schema-reference");
        assert_eq!(DiagnosticCode::SchemaParseError.as_str(), "schema-parse-error");
        assert_eq!(DiagnosticCode::IncorrectArgumentCount.id(), "TTL0002");
    }

    #[test]
    fn descriptor_table_matches_code_order() {
        for (index, code) in DiagnosticCode::ALL.into_iter().enumerate() {
            assert_eq!(code.id(), format!("TTL{:04}", index + 1));
            assert_eq!(DiagnosticCode::from_str_code(code.as_str()), Some(code));
        }
    }

    #[test]
    fn message_is_rendered_from_template() {
        let diag = Diagnostic::new(DiagnosticCode::IncorrectArgumentCount, ["2"]);
        assert_eq!(diag.message, "Incorrect number of arguments to schema binding annotation. (2!=3)");
        assert_eq!(diag.args, vec!["2".to_string()]);
        assert_eq!(diag.severity, Severity::Error);
    }

    #[test]
    fn template_keeps_unmatched_placeholders() {
        let rendered = render_template("{0} and {1} and {x}", &["a".to_string()]);
        assert_eq!(rendered, "a and {1} and {x}");
    }

    #[test]
    fn arguments_are_not_reexpanded() {
        let rendered = render_template("{0}-{1}", &["{1}".to_string(), "b".to_string()]);
        assert_eq!(rendered, "{1}-b");
    }

    #[test]
    fn location_only_set_when_absent() {
        let diag = Diagnostic::new(DiagnosticCode::UnresolvedSchemaReference, ["a.ttl"])
            .with_location(Location::with_position("src/lib.rs", 3, 1))
            .with_location_if_absent(Location::new("other.rs"));
        assert_eq!(diag.location.unwrap().file, "src/lib.rs");
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(DiagnosticCode::UnresolvedSchemaReference, ["missing.ttl"])
            .with_location(Location::with_position("src/model.rs", 42, 5));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("unresolved-schema-reference"));
        assert!(json.contains("error"));
        assert_eq!(diag.to_string(), "error[TTL0004] Cannot find linked schema document missing.ttl. (at src/model.rs:42:5)");
    }
}
