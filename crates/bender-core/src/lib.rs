//! Bender Core - Declarative combinators for bending JSON documents
//!
//! A transformation is described as data: a [`Template`] shaped like the
//! desired output, whose leaves are [`Bender`] combinators saying how each
//! value is computed from the source document and an optional ambient
//! context. [`bend`] walks the template and fills it in.
//!
//! # Main Components
//!
//! - **Combinators**: [`Bender`] and its operators (pipes, arithmetic, comparisons, indexing)
//! - **Selectors**: [`Select`], [`OptSelect`] and user functions via [`Func`]
//! - **Control flow**: [`If`], [`Alternation`], [`Switch`]
//! - **List operations**: [`ListOp`] map, filter, fold and flat-map
//! - **Strings**: [`Format`]
//! - **Error Handling**: [`Error`] for combinators, [`BendingError`] at the top level
//!
//! # Example
//!
//! ```
//! use bender_core::{bend, Bender, Format, Result, Template};
//! use serde_json::json;
//!
//! fn person() -> Result<Template> {
//!     let full_name = Format::new(
//!         "{} {}",
//!         [Bender::select(["first"])?, Bender::select(["last"])?],
//!     )?;
//!     Ok(Template::object([
//!         ("fullName", Template::from(full_name)),
//!         ("born", Template::from(Bender::select(["birth", "year"])?)),
//!     ]))
//! }
//!
//! let source = json!({"first": "Ada", "last": "Lovelace", "birth": {"year": 1815}});
//! let out = bend(&person().unwrap(), &source, None).unwrap();
//! assert_eq!(out, json!({"fullName": "Ada Lovelace", "born": 1815}));
//! ```

pub mod bender;
pub mod config;
pub mod control_flow;
pub mod error;
pub mod list_ops;
pub mod path;
pub mod selectors;
pub mod string_ops;
pub mod template;
pub mod value;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use bender::{Bender, BinaryOp, UnaryOp};
pub use config::BendConfig;
pub use control_flow::{Alternation, If, Switch};
pub use error::{BendingError, Error, Result};
pub use list_ops::{ListOp, ListOpKind};
pub use path::{PathKey, Slice};
pub use selectors::{Arguments, Func, OptSelect, Select};
pub use string_ops::Format;
pub use template::{bend, Bend, Template};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
