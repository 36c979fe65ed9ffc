//! Error types for the Bender core library
//!
//! Every combinator reports failures through [`Error`]. The structural
//! evaluator collapses whatever escapes a template into a single
//! [`BendingError`], so callers of [`crate::bend`] only ever match one type.

use thiserror::Error;

/// Errors raised while constructing or evaluating combinators
#[derive(Error, Debug)]
pub enum Error {
    /// A mapping has no entry for the requested key
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    /// An index fell outside the selected sequence
    #[error("Index out of bounds: {index} in array of length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    /// A switch table has no case for the selected key and no default
    #[error("No case for key {key} (available: {available:?})")]
    CaseNotFound { key: String, available: Vec<String> },

    /// Structurally invalid input to an operation
    #[error("Invalid value: {message}")]
    Value { message: String },

    /// Invalid constructor arguments, raised before any evaluation
    #[error("Configuration error in {component}: {message}")]
    Configuration {
        component: &'static str,
        message: String,
    },

    /// An operator was applied to values it does not support
    #[error("Type mismatch in {operation}: expected {expected}, found {found}")]
    TypeMismatch {
        operation: String,
        expected: String,
        found: String,
    },

    /// Division by zero, or a result that is not a finite number
    #[error("Arithmetic error: {message}")]
    Arithmetic { message: String },

    /// A user-supplied function failed
    #[error("Function {name}() failed: {source}")]
    Function {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Template nesting (including per-element sub-bends) went past the limit
    #[error("Maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a key-not-found error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Create an invalid value error
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value {
            message: message.into(),
        }
    }

    /// Create a configuration error for the named component
    pub fn configuration(component: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            component,
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        operation: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an arithmetic error
    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic {
            message: message.into(),
        }
    }

    /// Convert the failure of a user function into an [`Error`].
    ///
    /// A user function that propagated one of our own errors with `?` gets
    /// that error back unchanged, so a lookup failure raised inside a closure
    /// is still recoverable by optional selectors and alternations.
    pub fn from_function(name: &str, source: anyhow::Error) -> Self {
        match source.downcast::<Error>() {
            Ok(err) => err,
            Err(source) => Self::Function {
                name: name.to_string(),
                source,
            },
        }
    }

    /// Whether this error means "nothing found here"
    ///
    /// Lookup-class errors are the only ones optional selectors replace with
    /// their default and the only ones alternations fall through on.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound { .. } | Self::IndexOutOfBounds { .. } | Self::CaseNotFound { .. }
        )
    }
}

/// The single error returned from [`crate::bend`]
///
/// Wraps whichever error escaped the template, together with the location in
/// the template where it surfaced (`$` is the template root).
#[derive(Error, Debug)]
#[error("Bending failed at {path}: {source}")]
pub struct BendingError {
    /// Template location, e.g. `$.people[0].name`
    pub path: String,
    /// The original failure
    #[source]
    pub source: Error,
}

impl BendingError {
    /// The underlying error
    pub fn cause(&self) -> &Error {
        &self.source
    }

    /// Consume the wrapper and return the underlying error
    pub fn into_cause(self) -> Error {
        self.source
    }
}
