//! Schema bindings: declarations that request generation from a schema document

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::diagnostic::Location;

/// Fully-qualified name of a declaration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Module path, e.g. `crate::model`
    pub namespace: String,

    /// Simple type name, e.g. `Person`
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.name)
    }
}

/// Why binding arguments were rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("document key is empty")]
    EmptyDocumentKey,

    #[error("namespace is empty")]
    EmptyNamespace,

    #[error("type name is empty")]
    EmptyTypeName,

    #[error("prefix URI `{uri}` is not an absolute URI ({reason})")]
    InvalidPrefixUri { uri: String, reason: String },
}

/// A validated request to generate code for one declaration
///
/// Compared and hashed by value: two bindings with the same fields are
/// interchangeable for caching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Binding {
    document_key: String,
    namespace: String,
    type_name: String,
    preferred_prefix: String,
    prefix_uri: String,
}

impl Binding {
    /// Validate and build a binding
    pub fn new(
        document_key: impl Into<String>,
        name: QualifiedName,
        preferred_prefix: impl Into<String>,
        prefix_uri: &str,
    ) -> Result<Self, BindingError> {
        let document_key = document_key.into();
        if document_key.is_empty() {
            return Err(BindingError::EmptyDocumentKey);
        }
        if name.namespace.is_empty() {
            return Err(BindingError::EmptyNamespace);
        }
        if name.name.is_empty() {
            return Err(BindingError::EmptyTypeName);
        }

        // Parsed only to validate; the text is kept as written since `Url`
        // normalizes host case and trailing slashes.
        Url::parse(prefix_uri).map_err(|e| BindingError::InvalidPrefixUri {
            uri: prefix_uri.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            document_key,
            namespace: name.namespace,
            type_name: name.name,
            preferred_prefix: preferred_prefix.into(),
            prefix_uri: prefix_uri.to_string(),
        })
    }

    /// Schema document file name
    pub fn document_key(&self) -> &str {
        &self.document_key
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn preferred_prefix(&self) -> &str {
        &self.preferred_prefix
    }

    /// Prefix URI exactly as written in the annotation
    pub fn prefix_uri(&self) -> &str {
        &self.prefix_uri
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.namespace.clone(), self.type_name.clone())
    }
}

/// A binding together with where it was declared
///
/// The location stays outside [`Binding`] so that moving a declaration
/// inside its file does not invalidate generation for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScannedBinding {
    pub binding: Binding,
    pub location: Option<Location>,
}
