//! Primitive selectors: path selection and function wrapping
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

use crate::bender::Bender;
use crate::error::{Error, Result};
use crate::path::{self, PathKey, Slice};
use crate::value;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Selects a path of keys and indices, failing on the first missing step
///
/// ```
/// use bender_core::{path, Select};
/// use serde_json::json;
///
/// let select = Select::new(path!["a", 0, "b"]).unwrap();
/// assert_eq!(select.evaluate(&json!({"a": [{"b": 42}]})).unwrap(), json!(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    path: Vec<PathKey>,
}

impl Select {
    /// Create a selector; an empty path is rejected
    pub fn new<I, K>(path: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        let path: Vec<PathKey> = path.into_iter().map(Into::into).collect();
        if path.is_empty() {
            return Err(Error::value("no path given to selector"));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &[PathKey] {
        &self.path
    }

    /// Same path, with `default` returned when any step is missing
    pub fn optional(self, default: impl Into<Value>) -> OptSelect {
        OptSelect {
            select: self,
            default: default.into(),
        }
    }

    /// Select, then slice the selected sequence
    pub fn slice(self, slice: Slice) -> Bender {
        Bender::from(self).slice(slice)
    }

    pub fn evaluate(&self, document: &Value) -> Result<Value> {
        path::lookup_path(document, &self.path).cloned()
    }
}

/// Like [`Select`], but a missing key or index yields the default
///
/// Only lookup failures are absorbed; a type error part-way down the path
/// still propagates.
#[derive(Debug, Clone, PartialEq)]
pub struct OptSelect {
    select: Select,
    default: Value,
}

impl OptSelect {
    /// Optional selector with a `null` default
    pub fn new<I, K>(path: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        Ok(Select::new(path)?.optional(Value::Null))
    }

    /// Replace the default
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn path(&self) -> &[PathKey] {
        self.select.path()
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn evaluate(&self, document: &Value) -> Result<Value> {
        match path::lookup_path(document, self.select.path()) {
            Ok(found) => Ok(found.clone()),
            Err(err) if err.is_lookup() => Ok(self.default.clone()),
            Err(err) => Err(err),
        }
    }
}

/// Extra arguments bound to a wrapped function at construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    named: Map<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Bind a named argument
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Signature of a wrapped function
pub type FuncFn = dyn Fn(&Value, &Arguments) -> anyhow::Result<Value> + Send + Sync;

/// Wraps a function of the document plus fixed extra arguments
///
/// The protected form returns its input untouched when it equals the
/// sentinel, so e.g. a `null` never reaches a function that cannot take it.
#[derive(Clone)]
pub struct Func {
    name: String,
    function: Arc<FuncFn>,
    arguments: Arguments,
    sentinel: Option<Value>,
}

impl Func {
    /// Wrap a unary function
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::with_arguments(name, move |value, _| f(value), Arguments::new())
    }

    /// Wrap a function that also receives bound arguments
    pub fn with_arguments<F>(name: impl Into<String>, f: F, arguments: Arguments) -> Self
    where
        F: Fn(&Value, &Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            function: Arc::new(f),
            arguments,
            sentinel: None,
        }
    }

    /// Skip the function when the input equals `sentinel`
    pub fn protect(mut self, sentinel: impl Into<Value>) -> Self {
        self.sentinel = Some(sentinel.into());
        self
    }

    /// Skip the function when the input is `null`
    pub fn protected(self) -> Self {
        self.protect(Value::Null)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn evaluate(&self, document: &Value) -> Result<Value> {
        if self
            .sentinel
            .as_ref()
            .is_some_and(|sentinel| value::loose_eq(sentinel, document))
        {
            return Ok(document.clone());
        }
        (self.function)(document, &self.arguments).map_err(|err| Error::from_function(&self.name, err))
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("sentinel", &self.sentinel)
            .finish_non_exhaustive()
    }
}
