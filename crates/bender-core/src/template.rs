//! Templates and the structural evaluator
//!
//! A [`Template`] has the shape of the output document. Objects and arrays
//! are walked recursively, combinator leaves are replaced by their results,
//! and every other value is copied through unchanged. Failures are caught
//! once, at [`Bend::run`], and reported as a [`BendingError`] naming the
//! template location where they surfaced.
//!
//! ```
//! use bender_core::{bend, Bender, Template};
//! use serde_json::json;
//!
//! let template = Template::object([
//!     ("name", Template::from(Bender::select(["first"]).unwrap())),
//!     ("kind", Template::from(json!("person"))),
//! ]);
//! let out = bend(&template, &json!({"first": "Ada"}), None).unwrap();
//! assert_eq!(out, json!({"name": "Ada", "kind": "person"}));
//! ```
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

use crate::bender::{Bender, Scope};
use crate::config::BendConfig;
use crate::control_flow::{Alternation, If, Switch};
use crate::error::{BendingError, Error, Result};
use crate::list_ops::ListOp;
use crate::selectors::{Func, OptSelect, Select};
use crate::string_ops::Format;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use tracing::{debug, debug_span};

/// Output-shaped structure whose leaves may be combinators
#[derive(Debug, Clone)]
pub enum Template {
    /// Replaced by its result
    Bender(Bender),
    /// Keys kept in order, values bent
    Object(Vec<(String, Template)>),
    /// Elements bent in order
    Array(Vec<Template>),
    /// Copied through unchanged
    Value(Value),
}

impl Template {
    pub fn object<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Template>,
    {
        Template::Object(
            entries
                .into_iter()
                .map(|(key, template)| (key.into(), template.into()))
                .collect(),
        )
    }

    pub fn array<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Template>,
    {
        Template::Array(elements.into_iter().map(Into::into).collect())
    }

    /// Whether the template contains no combinators at all
    pub fn is_static(&self) -> bool {
        match self {
            Template::Bender(_) => false,
            Template::Object(entries) => entries.iter().all(|(_, t)| t.is_static()),
            Template::Array(elements) => elements.iter().all(Template::is_static),
            Template::Value(_) => true,
        }
    }

    pub(crate) fn eval(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        self.resolve(document, scope).map_err(|failure| failure.error)
    }

    fn resolve(&self, document: &Value, scope: Scope<'_>) -> std::result::Result<Value, Failure> {
        match self {
            Template::Bender(bender) => bender.eval(document, scope).map_err(Failure::new),
            Template::Value(value) => Ok(value.clone()),
            Template::Object(entries) => {
                let scope = scope.descend().map_err(Failure::new)?;
                let mut out = Map::with_capacity(entries.len());
                for (key, template) in entries {
                    let value = template
                        .resolve(document, scope)
                        .map_err(|f| f.within(Segment::Key(key.clone())))?;
                    out.insert(key.clone(), value);
                }
                Ok(Value::Object(out))
            }
            Template::Array(elements) => {
                let scope = scope.descend().map_err(Failure::new)?;
                elements
                    .iter()
                    .enumerate()
                    .map(|(i, template)| {
                        template
                            .resolve(document, scope)
                            .map_err(|f| f.within(Segment::Index(i)))
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }
}

/// A plain value is copied through whole, however deeply it nests
impl From<Value> for Template {
    fn from(value: Value) -> Self {
        Template::Value(value)
    }
}

impl From<Bender> for Template {
    fn from(bender: Bender) -> Self {
        Template::Bender(bender)
    }
}

impl From<Vec<Template>> for Template {
    fn from(elements: Vec<Template>) -> Self {
        Template::Array(elements)
    }
}

macro_rules! template_from_bender {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Template {
                fn from(bender: $ty) -> Self {
                    Template::Bender(bender.into())
                }
            }
        )*
    };
}

template_from_bender!(Select, OptSelect, Func, Format, If, Alternation, Switch, ListOp);

#[derive(Debug)]
enum Segment {
    Key(String),
    Index(usize),
}

/// An error on its way out of the template, collecting where it came from
struct Failure {
    /// Innermost segment first
    trail: Vec<Segment>,
    error: Error,
}

impl Failure {
    fn new(error: Error) -> Self {
        Self {
            trail: Vec::new(),
            error,
        }
    }

    fn within(mut self, segment: Segment) -> Self {
        self.trail.push(segment);
        self
    }

    fn path(&self) -> String {
        let mut path = String::from("$");
        for segment in self.trail.iter().rev() {
            // Writing to a String cannot fail
            let _ = match segment {
                Segment::Key(key) => write!(path, ".{}", key),
                Segment::Index(i) => write!(path, "[{}]", i),
            };
        }
        path
    }
}

/// Reusable evaluator carrying a [`BendConfig`]
#[derive(Debug, Clone, Default)]
pub struct Bend {
    config: BendConfig,
}

impl Bend {
    pub fn new(config: BendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BendConfig {
        &self.config
    }

    /// Bend `document` into the shape of `template`
    ///
    /// `context` defaults to `null`. Every failure, whatever its kind, is
    /// returned as a [`BendingError`] holding the original error.
    pub fn run(
        &self,
        template: &Template,
        document: &Value,
        context: Option<&Value>,
    ) -> std::result::Result<Value, BendingError> {
        let _span = debug_span!("bend", max_depth = self.config.max_depth).entered();

        let context = context.unwrap_or(&Value::Null);
        template
            .resolve(document, Scope::new(context, &self.config))
            .map_err(|failure| {
                let path = failure.path();
                debug!(path = %path, error = %failure.error, "bending failed");
                BendingError {
                    path,
                    source: failure.error,
                }
            })
    }
}

/// Bend `document` into the shape of `template` with the default settings
pub fn bend(
    template: &Template,
    document: &Value,
    context: Option<&Value>,
) -> std::result::Result<Value, BendingError> {
    Bend::default().run(template, document, context)
}
