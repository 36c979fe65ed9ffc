//! Path steps for indexing into documents
//!
//! A path is an ordered list of [`PathKey`]s. Keys address mapping entries,
//! indices address sequence elements (negative indices count from the end),
//! and a [`Slice`] cuts a sub-sequence out of an array or string.
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::value::type_name;
use serde_json::Value;
use std::fmt;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// Mapping key
    Key(String),
    /// Sequence index, negative values count from the end
    Index(i64),
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<i64> for PathKey {
    fn from(index: i64) -> Self {
        PathKey::Index(index)
    }
}

impl From<i32> for PathKey {
    fn from(index: i32) -> Self {
        PathKey::Index(i64::from(index))
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(key) => write!(f, "{:?}", key),
            PathKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Build a `Vec<PathKey>` from mixed keys and indices
///
/// ```
/// use bender_core::{path, PathKey};
///
/// let steps = path!["items", 0, "name"];
/// assert_eq!(steps[1], PathKey::Index(0));
/// ```
#[macro_export]
macro_rules! path {
    ($($step:expr),* $(,)?) => {
        vec![$($crate::PathKey::from($step)),*]
    };
}

/// Index one step into a value
pub fn lookup<'a>(value: &'a Value, key: &PathKey) -> Result<&'a Value> {
    match (value, key) {
        (Value::Object(map), PathKey::Key(k)) => {
            map.get(k).ok_or_else(|| Error::key_not_found(k.as_str()))
        }
        // Mapping keys are strings, so an integer step looks for its decimal form
        (Value::Object(map), PathKey::Index(i)) => map
            .get(&i.to_string())
            .ok_or_else(|| Error::key_not_found(i.to_string())),
        (Value::Array(items), PathKey::Index(i)) => resolve_index(*i, items.len())
            .map(|idx| &items[idx])
            .ok_or(Error::IndexOutOfBounds {
                index: *i,
                length: items.len(),
            }),
        (Value::Null, PathKey::Key(k)) => Err(Error::key_not_found(k.as_str())),
        (Value::Null, PathKey::Index(i)) => Err(Error::key_not_found(i.to_string())),
        (other, PathKey::Key(_)) => Err(Error::type_mismatch(
            format!("lookup of {}", key),
            "object",
            type_name(other),
        )),
        (other, PathKey::Index(_)) => Err(Error::type_mismatch(
            format!("lookup of {}", key),
            "array or object",
            type_name(other),
        )),
    }
}

/// Follow a whole path from `value`
pub fn lookup_path<'a>(value: &'a Value, path: &[PathKey]) -> Result<&'a Value> {
    path.iter().try_fold(value, |current, key| lookup(current, key))
}

fn resolve_index(index: i64, length: usize) -> Option<usize> {
    let len = i64::try_from(length).ok()?;
    let effective = if index < 0 { index + len } else { index };
    if (0..len).contains(&effective) {
        usize::try_from(effective).ok()
    } else {
        None
    }
}

/// A `start:end:step` slice
///
/// Bounds are clamped to the sequence and may be negative. A negative step
/// walks backwards; its default start is the last element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    start: Option<i64>,
    end: Option<i64>,
    step: i64,
}

impl Slice {
    /// Create a slice, rejecting a zero step
    pub fn new(start: Option<i64>, end: Option<i64>, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::configuration("slice", "slice step cannot be zero"));
        }
        Ok(Self { start, end, step })
    }

    /// `start..end` with a step of one
    pub fn range(start: Option<i64>, end: Option<i64>) -> Self {
        Self {
            start,
            end,
            step: 1,
        }
    }

    pub fn start(&self) -> Option<i64> {
        self.start
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Positions selected from a sequence of `length` elements, in order
    pub fn indices(&self, length: usize) -> Vec<usize> {
        let len = i64::try_from(length).unwrap_or(i64::MAX);
        let mut picked = Vec::new();

        if self.step > 0 {
            let clamp = |bound: i64| {
                if bound < 0 {
                    (bound + len).max(0)
                } else {
                    bound.min(len)
                }
            };
            let mut i = self.start.map_or(0, clamp);
            let end = self.end.map_or(len, clamp);
            while i < end {
                picked.push(i);
                i = i.saturating_add(self.step);
            }
        } else {
            // -1 stands for "before the first element"
            let clamp = |bound: i64| {
                if bound < 0 {
                    (bound + len).max(-1)
                } else {
                    bound.min(len - 1)
                }
            };
            let mut i = self.start.map_or(len - 1, clamp);
            let end = self.end.map_or(-1, clamp);
            while i > end {
                picked.push(i);
                i = i.saturating_add(self.step);
            }
        }

        picked
            .into_iter()
            .filter_map(|i| usize::try_from(i).ok())
            .collect()
    }

    /// Apply this slice to an array or string
    pub fn apply(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Array(items) => Ok(Value::Array(
                self.indices(items.len())
                    .into_iter()
                    .map(|i| items[i].clone())
                    .collect(),
            )),
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                Ok(Value::String(
                    self.indices(chars.len()).into_iter().map(|i| chars[i]).collect(),
                ))
            }
            other => Err(Error::type_mismatch(
                format!("slice {}", self),
                "array or string",
                type_name(other),
            )),
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(end) = self.end {
            write!(f, "{}", end)?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}
