//! The combinator algebra
//!
//! A [`Bender`] is an immutable description of how to compute a value from a
//! document and an ambient context. Every kind of combinator is one variant
//! of the enum, and composite variants hold their operands, so a composed
//! transformation is plain data that can be cloned, inspected, and shared
//! between threads.
//!
//! # Examples
//!
//! ```
//! use bender_core::{Bender, Result};
//! use serde_json::json;
//!
//! fn total() -> Result<Bender> {
//!     Ok(Bender::select(["price"])? * Bender::select(["quantity"])?)
//! }
//!
//! let order = json!({"price": 3, "quantity": 4});
//! assert_eq!(total().unwrap().call(&order).unwrap(), json!(12));
//! ```
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

mod ops;

pub use ops::{BinaryOp, UnaryOp};

use crate::config::BendConfig;
use crate::control_flow::{Alternation, If, Switch};
use crate::error::{Error, Result};
use crate::list_ops::ListOp;
use crate::path::{self, PathKey, Slice};
use crate::selectors::{Func, OptSelect, Select};
use crate::string_ops::Format;
use serde_json::Value;

/// A composable, side-effect-free transformation `(document, context) -> value`
#[derive(Debug, Clone)]
pub enum Bender {
    /// Always the same value
    Constant(Value),
    /// The ambient context of the current evaluation
    Context,
    /// Required path selection
    Select(Select),
    /// Path selection with a fallback value
    OptSelect(OptSelect),
    /// User function applied to the document
    Func(Func),
    /// String built from a format template
    Format(Format),
    /// Feed the first result to the second as its document
    Pipe(Box<Bender>, Box<Bender>),
    /// Both operands evaluated, then combined
    Binary {
        op: BinaryOp,
        lhs: Box<Bender>,
        rhs: Box<Bender>,
    },
    /// Operand evaluated, then transformed
    Unary { op: UnaryOp, operand: Box<Bender> },
    /// Result indexed by a key or position
    Index { target: Box<Bender>, key: PathKey },
    /// Result sliced
    Slice { target: Box<Bender>, slice: Slice },
    /// Conditional
    If(If),
    /// First alternative that finds something
    Alternation(Alternation),
    /// Table dispatch on a selected key
    Switch(Switch),
    /// Map, filter, fold or flat-map over the document
    ListOp(ListOp),
}

/// Evaluation state threaded through every combinator call
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    /// Ambient context, the same reference at every depth unless a sub-bend overrides it
    pub(crate) context: &'a Value,
    pub(crate) config: &'a BendConfig,
    /// Current template nesting depth
    pub(crate) depth: usize,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(context: &'a Value, config: &'a BendConfig) -> Self {
        Self {
            context,
            config,
            depth: 0,
        }
    }

    /// One level deeper into a template, bounded by the configured limit
    pub(crate) fn descend(self) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > self.config.max_depth {
            return Err(Error::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(Self { depth, ..self })
    }

    /// Same depth and configuration, different context
    pub(crate) fn with_context<'b>(self, context: &'b Value) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope {
            context,
            config: self.config,
            depth: self.depth,
        }
    }
}

/// An intermediate result carried through a pipe along with its scope
pub(crate) struct Transport<'a> {
    value: Value,
    scope: Scope<'a>,
}

impl<'a> Transport<'a> {
    pub(crate) fn start(bender: &Bender, document: &Value, scope: Scope<'a>) -> Result<Self> {
        Ok(Self {
            value: bender.eval(document, scope)?,
            scope,
        })
    }

    pub(crate) fn then(self, next: &Bender) -> Result<Self> {
        Ok(Self {
            value: next.eval(&self.value, self.scope)?,
            scope: self.scope,
        })
    }

    pub(crate) fn resolve(self) -> Value {
        self.value
    }
}

impl Bender {
    /// Evaluate against a document and an ambient context
    pub fn evaluate(&self, document: &Value, context: &Value) -> Result<Value> {
        self.eval(document, Scope::new(context, &BendConfig::DEFAULT))
    }

    /// Evaluate with a `null` context
    pub fn call(&self, document: &Value) -> Result<Value> {
        self.evaluate(document, &Value::Null)
    }

    pub(crate) fn eval(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        match self {
            Bender::Constant(value) => Ok(value.clone()),
            Bender::Context => Ok(scope.context.clone()),
            Bender::Select(select) => select.evaluate(document),
            Bender::OptSelect(select) => select.evaluate(document),
            Bender::Func(func) => func.evaluate(document),
            Bender::Format(format) => format.eval(document, scope),
            Bender::Pipe(first, second) => Ok(Transport::start(first, document, scope)?
                .then(second)?
                .resolve()),
            Bender::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval(document, scope)?;
                let rhs = rhs.eval(document, scope)?;
                op.apply(&lhs, &rhs)
            }
            Bender::Unary { op, operand } => op.apply(&operand.eval(document, scope)?),
            Bender::Index { target, key } => {
                let value = target.eval(document, scope)?;
                path::lookup(&value, key).cloned()
            }
            Bender::Slice { target, slice } => slice.apply(&target.eval(document, scope)?),
            Bender::If(cond) => cond.eval(document, scope),
            Bender::Alternation(alternation) => alternation.eval(document, scope),
            Bender::Switch(switch) => switch.eval(document, scope),
            Bender::ListOp(list_op) => list_op.eval(document, scope),
        }
    }

    /// A combinator that ignores its input
    pub fn constant(value: impl Into<Value>) -> Self {
        Bender::Constant(value.into())
    }

    /// The ambient context; pipe into a selector to read fields from it
    pub fn context() -> Self {
        Bender::Context
    }

    /// Required path selection, see [`Select`]
    pub fn select<I, K>(path: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        Ok(Select::new(path)?.into())
    }

    /// Optional path selection, see [`OptSelect`]
    pub fn opt_select<I, K>(path: I, default: impl Into<Value>) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        Ok(Select::new(path)?.optional(default).into())
    }

    /// Wrap a unary function, see [`Func`]
    pub fn func<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Func::new(name, f).into()
    }

    /// `self` first, then `next` on its result
    pub fn then(self, next: impl Into<Bender>) -> Self {
        Bender::Pipe(Box::new(self), Box::new(next.into()))
    }

    /// `previous` first, then `self` on its result
    pub fn after(self, previous: impl Into<Bender>) -> Self {
        Bender::Pipe(Box::new(previous.into()), Box::new(self))
    }

    /// Named factory for binary composites
    pub fn binary(op: BinaryOp, lhs: impl Into<Bender>, rhs: impl Into<Bender>) -> Self {
        Bender::Binary {
            op,
            lhs: Box::new(lhs.into()),
            rhs: Box::new(rhs.into()),
        }
    }

    /// Named factory for unary composites
    pub fn unary(op: UnaryOp, operand: impl Into<Bender>) -> Self {
        Bender::Unary {
            op,
            operand: Box::new(operand.into()),
        }
    }

    pub fn equals(self, other: impl Into<Bender>) -> Self {
        Self::binary(BinaryOp::Eq, self, other)
    }

    pub fn not_equals(self, other: impl Into<Bender>) -> Self {
        Self::binary(BinaryOp::Ne, self, other)
    }

    pub fn less_than(self, other: impl Into<Bender>) -> Self {
        Self::binary(BinaryOp::Lt, self, other)
    }

    pub fn less_or_equal(self, other: impl Into<Bender>) -> Self {
        Self::binary(BinaryOp::Le, self, other)
    }

    pub fn greater_than(self, other: impl Into<Bender>) -> Self {
        Self::binary(BinaryOp::Gt, self, other)
    }

    pub fn greater_or_equal(self, other: impl Into<Bender>) -> Self {
        Self::binary(BinaryOp::Ge, self, other)
    }

    /// Index the result by key or position
    pub fn get(self, key: impl Into<PathKey>) -> Self {
        Bender::Index {
            target: Box::new(self),
            key: key.into(),
        }
    }

    /// Slice the result
    pub fn slice(self, slice: Slice) -> Self {
        Bender::Slice {
            target: Box::new(self),
            slice,
        }
    }
}

impl From<Select> for Bender {
    fn from(select: Select) -> Self {
        Bender::Select(select)
    }
}

impl From<OptSelect> for Bender {
    fn from(select: OptSelect) -> Self {
        Bender::OptSelect(select)
    }
}

impl From<Func> for Bender {
    fn from(func: Func) -> Self {
        Bender::Func(func)
    }
}

impl From<Format> for Bender {
    fn from(format: Format) -> Self {
        Bender::Format(format)
    }
}

impl From<If> for Bender {
    fn from(cond: If) -> Self {
        Bender::If(cond)
    }
}

impl From<Alternation> for Bender {
    fn from(alternation: Alternation) -> Self {
        Bender::Alternation(alternation)
    }
}

impl From<Switch> for Bender {
    fn from(switch: Switch) -> Self {
        Bender::Switch(switch)
    }
}

impl From<ListOp> for Bender {
    fn from(list_op: ListOp) -> Self {
        Bender::ListOp(list_op)
    }
}
