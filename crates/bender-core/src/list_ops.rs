//! Operations over the selected sequence
//!
//! A list operation takes the array it is evaluated against (usually piped
//! in from a selector) and maps, filters, folds or flat-maps it. The
//! per-element step is either a plain function or a sub-template bent once
//! per element, see [`ListOpKind::bend_each`].
//!
//! ```
//! use bender_core::{Bender, ListOp};
//! use serde_json::json;
//!
//! let doubled = Bender::select(["items"]).unwrap().then(ListOp::map("double", |v| {
//!     Ok(json!(v.as_i64().unwrap_or_default() * 2))
//! }));
//! assert_eq!(doubled.call(&json!({"items": [1, 2, 3]})).unwrap(), json!([2, 4, 6]));
//! ```
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

use crate::bender::Scope;
use crate::error::{Error, Result};
use crate::template::Template;
use crate::value::{is_truthy, type_name};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Per-element function of map, filter and flat-map
pub type ElementFn = dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync;

/// Accumulating function of fold: `(accumulator, element) -> accumulator`
pub type FoldFn = dyn Fn(Value, &Value) -> anyhow::Result<Value> + Send + Sync;

/// The four list operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOpKind {
    Map,
    Filter,
    Fold,
    FlatMap,
}

impl ListOpKind {
    pub fn name(self) -> &'static str {
        match self {
            ListOpKind::Map => "map",
            ListOpKind::Filter => "filter",
            ListOpKind::Fold => "fold",
            ListOpKind::FlatMap => "flat_map",
        }
    }

    /// Build a list operation whose step bends `template` against each element
    ///
    /// Without `context` the sub-bends see the context of the enclosing
    /// evaluation. For [`ListOpKind::Fold`] each step is bent against the
    /// pair `[accumulator, element]`; for [`ListOpKind::Filter`] the bent
    /// result is tested for truthiness; for [`ListOpKind::FlatMap`] it must
    /// be an array.
    pub fn bend_each(self, template: impl Into<Template>, context: Option<Value>) -> ListOp {
        let sub = SubBend {
            template: Arc::new(template.into()),
            context,
        };
        let op = match self {
            ListOpKind::Map => Op::Map(ElementStep::Bend(sub)),
            ListOpKind::Filter => Op::Filter(ElementStep::Bend(sub)),
            ListOpKind::Fold => Op::Fold(FoldStep::Bend(sub)),
            ListOpKind::FlatMap => Op::FlatMap(ElementStep::Bend(sub)),
        };
        ListOp { op }
    }
}

impl fmt::Display for ListOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A template bent once per element
#[derive(Debug, Clone)]
struct SubBend {
    template: Arc<Template>,
    context: Option<Value>,
}

impl SubBend {
    fn run(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        let scope = scope.descend()?;
        match &self.context {
            Some(context) => self.template.eval(document, scope.with_context(context)),
            None => self.template.eval(document, scope),
        }
    }
}

#[derive(Clone)]
enum ElementStep {
    Func { name: String, f: Arc<ElementFn> },
    Bend(SubBend),
}

impl ElementStep {
    fn apply(&self, element: &Value, scope: Scope<'_>) -> Result<Value> {
        match self {
            ElementStep::Func { name, f } => f(element).map_err(|err| Error::from_function(name, err)),
            ElementStep::Bend(sub) => sub.run(element, scope),
        }
    }
}

#[derive(Clone)]
enum FoldStep {
    Func { name: String, f: Arc<FoldFn> },
    Bend(SubBend),
}

impl FoldStep {
    fn combine(&self, accumulator: Value, element: &Value, scope: Scope<'_>) -> Result<Value> {
        match self {
            FoldStep::Func { name, f } => {
                f(accumulator, element).map_err(|err| Error::from_function(name, err))
            }
            FoldStep::Bend(sub) => sub.run(&Value::Array(vec![accumulator, element.clone()]), scope),
        }
    }
}

#[derive(Clone)]
enum Op {
    Map(ElementStep),
    Filter(ElementStep),
    Fold(FoldStep),
    FlatMap(ElementStep),
}

/// Map, filter, fold or flat-map over the array being evaluated
#[derive(Clone)]
pub struct ListOp {
    op: Op,
}

impl ListOp {
    /// New array with `f` applied to every element
    pub fn map<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            op: Op::Map(ElementStep::Func {
                name: name.into(),
                f: Arc::new(f),
            }),
        }
    }

    /// Elements for which `predicate` holds, in their original order
    pub fn filter<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            op: Op::Filter(ElementStep::Func {
                name: name.into(),
                f: Arc::new(move |element: &Value| predicate(element).map(Value::Bool)),
            }),
        }
    }

    /// Left fold seeded with the first element
    ///
    /// An empty array is an error; a single element is returned without
    /// calling `f`.
    pub fn fold<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            op: Op::Fold(FoldStep::Func {
                name: name.into(),
                f: Arc::new(f),
            }),
        }
    }

    /// Concatenation of the arrays `f` returns for each element
    pub fn flat_map<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Vec<Value>> + Send + Sync + 'static,
    {
        Self {
            op: Op::FlatMap(ElementStep::Func {
                name: name.into(),
                f: Arc::new(move |element: &Value| f(element).map(Value::Array)),
            }),
        }
    }

    pub fn kind(&self) -> ListOpKind {
        match self.op {
            Op::Map(_) => ListOpKind::Map,
            Op::Filter(_) => ListOpKind::Filter,
            Op::Fold(_) => ListOpKind::Fold,
            Op::FlatMap(_) => ListOpKind::FlatMap,
        }
    }

    pub(crate) fn eval(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        let items = document.as_array().ok_or_else(|| {
            Error::type_mismatch(self.kind().name(), "array", type_name(document))
        })?;

        match &self.op {
            Op::Map(step) => items
                .iter()
                .map(|item| step.apply(item, scope))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Op::Filter(step) => {
                let mut kept = Vec::new();
                for item in items {
                    if is_truthy(&step.apply(item, scope)?) {
                        kept.push(item.clone());
                    }
                }
                Ok(Value::Array(kept))
            }
            Op::Fold(step) => {
                let mut rest = items.iter();
                let first = rest
                    .next()
                    .ok_or_else(|| Error::value("fold of an empty sequence with no initial value"))?;
                rest.try_fold(first.clone(), |acc, item| step.combine(acc, item, scope))
            }
            Op::FlatMap(step) => {
                let mut flat = Vec::new();
                for item in items {
                    match step.apply(item, scope)? {
                        Value::Array(sub) => flat.extend(sub),
                        other => {
                            return Err(Error::type_mismatch(
                                "flat_map step",
                                "array",
                                type_name(&other),
                            ))
                        }
                    }
                }
                Ok(Value::Array(flat))
            }
        }
    }
}

impl fmt::Debug for ListOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ListOp");
        out.field("kind", &self.kind());
        match &self.op {
            Op::Map(step) | Op::Filter(step) | Op::FlatMap(step) => match step {
                ElementStep::Func { name, .. } => out.field("func", name),
                ElementStep::Bend(sub) => out.field("bend", sub),
            },
            Op::Fold(step) => match step {
                FoldStep::Func { name, .. } => out.field("func", name),
                FoldStep::Bend(sub) => out.field("bend", sub),
            },
        };
        out.finish()
    }
}
