//! Success-or-diagnostics carrier
//!
//! Every stage of the pipeline returns an [`Outcome`] instead of an error
//! type: either a value, or a non-empty list of diagnostics. Never both and
//! never an empty failure.

use crate::diagnostic::Diagnostic;

/// Non-empty, ordered list of diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// A list holding a single diagnostic
    pub fn new(first: Diagnostic) -> Self {
        Self(vec![first])
    }

    /// Returns `None` for an empty vector
    pub fn from_vec(diagnostics: Vec<Diagnostic>) -> Option<Self> {
        if diagnostics.is_empty() {
            None
        } else {
            Some(Self(diagnostics))
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn first(&self) -> &Diagnostic {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }

    /// Rewrite every diagnostic, keeping the list non-empty
    pub fn map_each(self, f: impl FnMut(Diagnostic) -> Diagnostic) -> Self {
        Self(self.0.into_iter().map(f).collect())
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(diagnostic)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Returned when the value of a failed outcome is requested
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("outcome has no value: failed with {count} diagnostic(s), first: {first}")]
pub struct InvalidState {
    /// Number of diagnostics carried by the failed outcome
    pub count: usize,

    /// Rendered first diagnostic
    pub first: String,
}

/// Either a value or a non-empty list of diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    Ok(T),
    Err(Diagnostics),
}

impl<T> Outcome<T> {
    /// Successful outcome
    pub fn ok(value: T) -> Self {
        Self::Ok(value)
    }

    /// Failed outcome
    pub fn err(diagnostics: impl Into<Diagnostics>) -> Self {
        Self::Err(diagnostics.into())
    }

    /// True iff this outcome was constructed as a success
    pub fn has_value(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Borrow the value, or fail with [`InvalidState`]
    pub fn value(&self) -> Result<&T, InvalidState> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(diagnostics) => Err(invalid_state(diagnostics)),
        }
    }

    /// Take the value, or fail with [`InvalidState`]
    pub fn into_value(self) -> Result<T, InvalidState> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(diagnostics) => Err(invalid_state(&diagnostics)),
        }
    }

    /// Diagnostics of a failure; empty for a success
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Ok(_) => &[],
            Self::Err(diagnostics) => diagnostics.as_slice(),
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Self::Ok(value) => Outcome::Ok(value),
            Self::Err(diagnostics) => Outcome::Err(diagnostics.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Err(diagnostics) => Outcome::Err(diagnostics),
        }
    }

    /// Chain a fallible step
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Ok(value) => f(value),
            Self::Err(diagnostics) => Outcome::Err(diagnostics),
        }
    }

    /// Rewrite the diagnostics of a failure; a success is returned unchanged
    pub fn map_diagnostics(self, f: impl FnMut(Diagnostic) -> Diagnostic) -> Self {
        match self {
            Self::Ok(value) => Self::Ok(value),
            Self::Err(diagnostics) => Self::Err(diagnostics.map_each(f)),
        }
    }

    pub fn into_result(self) -> Result<T, Diagnostics> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(diagnostics) => Err(diagnostics),
        }
    }
}

impl<T> From<Diagnostic> for Outcome<T> {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::Err(Diagnostics::new(diagnostic))
    }
}

impl<T> From<Diagnostics> for Outcome<T> {
    fn from(diagnostics: Diagnostics) -> Self {
        Self::Err(diagnostics)
    }
}

impl<T> From<Result<T, Diagnostic>> for Outcome<T> {
    fn from(result: Result<T, Diagnostic>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(diagnostic) => diagnostic.into(),
        }
    }
}

fn invalid_state(diagnostics: &Diagnostics) -> InvalidState {
    InvalidState {
        count: diagnostics.len(),
        first: diagnostics.first().to_string(),
    }
}
