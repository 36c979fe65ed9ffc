//! Conditional, alternation and switch combinators
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

use crate::bender::{Bender, Scope};
use crate::error::{Error, Result};
use crate::value::is_truthy;
use serde_json::Value;
use std::collections::HashMap;

/// Evaluates one of two branches depending on the truthiness of a test
///
/// A missing branch evaluates to `null`.
#[derive(Debug, Clone)]
pub struct If {
    condition: Box<Bender>,
    when_true: Option<Box<Bender>>,
    when_false: Option<Box<Bender>>,
}

impl If {
    pub fn new(condition: impl Into<Bender>) -> Self {
        Self {
            condition: Box::new(condition.into()),
            when_true: None,
            when_false: None,
        }
    }

    pub fn when_true(mut self, bender: impl Into<Bender>) -> Self {
        self.when_true = Some(Box::new(bender.into()));
        self
    }

    pub fn when_false(mut self, bender: impl Into<Bender>) -> Self {
        self.when_false = Some(Box::new(bender.into()));
        self
    }

    pub(crate) fn eval(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        let branch = if is_truthy(&self.condition.eval(document, scope)?) {
            &self.when_true
        } else {
            &self.when_false
        };
        match branch {
            Some(bender) => bender.eval(document, scope),
            None => Ok(Value::Null),
        }
    }
}

/// Tries each bender in order and returns the first that finds something
///
/// Only lookup failures move on to the next alternative; any other error is
/// returned immediately. When every alternative misses, the error of the
/// last one is returned.
#[derive(Debug, Clone)]
pub struct Alternation {
    benders: Vec<Bender>,
}

impl Alternation {
    /// Create an alternation; at least one bender is required
    pub fn new<I, B>(benders: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bender>,
    {
        let benders: Vec<Bender> = benders.into_iter().map(Into::into).collect();
        if benders.is_empty() {
            return Err(Error::value("alternation needs at least one bender"));
        }
        Ok(Self { benders })
    }

    pub fn len(&self) -> usize {
        self.benders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benders.is_empty()
    }

    pub(crate) fn eval(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        let mut last_error = None;
        for (attempt, bender) in self.benders.iter().enumerate() {
            match bender.eval(document, scope) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_lookup() => {
                    tracing::trace!(attempt, error = %err, "alternative missed, trying next");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_error.unwrap_or_else(|| Error::value("alternation needs at least one bender")))
    }
}

/// Dispatches on a selected key through a fixed table of cases
///
/// Keys are matched by their JSON encoding, so `"1"` and `1` are distinct
/// cases. Numbers are encoded by value, so `1` and `1.0` are the same case.
#[derive(Debug, Clone)]
pub struct Switch {
    selector: Box<Bender>,
    cases: HashMap<String, Bender>,
    default: Option<Box<Bender>>,
}

impl Switch {
    pub fn new<I, K, B>(selector: impl Into<Bender>, cases: I) -> Self
    where
        I: IntoIterator<Item = (K, B)>,
        K: Into<Value>,
        B: Into<Bender>,
    {
        Self {
            selector: Box::new(selector.into()),
            cases: cases
                .into_iter()
                .map(|(key, bender)| (case_key(&key.into()), bender.into()))
                .collect(),
            default: None,
        }
    }

    /// Bender used when no case matches
    pub fn with_default(mut self, bender: impl Into<Bender>) -> Self {
        self.default = Some(Box::new(bender.into()));
        self
    }

    pub(crate) fn eval(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        let key = case_key(&self.selector.eval(document, scope)?);
        if let Some(case) = self.cases.get(&key) {
            return case.eval(document, scope);
        }
        match &self.default {
            Some(default) => {
                tracing::trace!(key = %key, "no switch case matched, using default");
                default.eval(document, scope)
            }
            None => {
                let mut available: Vec<String> = self.cases.keys().cloned().collect();
                available.sort();
                Err(Error::CaseNotFound { key, available })
            }
        }
    }
}

fn case_key(value: &Value) -> String {
    canonical(value).to_string()
}

/// Integral floats rewritten as integers, at any depth
fn canonical(value: &Value) -> Value {
    match value {
        Value::Number(n) if !n.is_i64() && !n.is_u64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonical(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s(key: &str) -> Bender {
        Bender::select([key]).unwrap()
    }

    fn na_li() -> Value {
        json!({"country": "China", "first_name": "Li", "last_name": "Na"})
    }

    fn guga() -> Value {
        json!({"country": "Brazil", "first_name": "Gustavo", "last_name": "Kuerten"})
    }

    fn is_china() -> Bender {
        s("country").equals(Bender::constant("China"))
    }

    #[test]
    fn test_if_true() {
        let if_ = If::new(is_china()).when_true(s("first_name")).when_false(s("last_name"));
        assert_eq!(Bender::from(if_).call(&na_li()).unwrap(), json!("Li"));
    }

    #[test]
    fn test_if_false() {
        let if_ = If::new(is_china()).when_true(s("first_name")).when_false(s("last_name"));
        assert_eq!(Bender::from(if_).call(&guga()).unwrap(), json!("Kuerten"));
    }

    #[test]
    fn test_if_true_default() {
        let if_ = If::new(is_china()).when_false(s("last_name"));
        assert_eq!(Bender::from(if_).call(&na_li()).unwrap(), Value::Null);
    }

    #[test]
    fn test_if_false_default() {
        let if_ = If::new(is_china()).when_true(s("first_name"));
        assert_eq!(Bender::from(if_).call(&guga()).unwrap(), Value::Null);
    }

    #[test]
    fn test_if_only_runs_taken_branch() {
        let if_ = If::new(Bender::constant(true))
            .when_true(Bender::constant(1))
            .when_false(s("missing"));
        assert_eq!(Bender::from(if_).call(&json!({})).unwrap(), json!(1));
    }

    #[test]
    fn test_empty_alternation() {
        let none: Vec<Bender> = Vec::new();
        assert!(matches!(Alternation::new(none), Err(Error::Value { .. })));
    }

    #[test]
    fn test_alternation_matches() {
        let bender: Bender = Alternation::new([
            Bender::select([1]).unwrap(),
            Bender::select([0]).unwrap(),
            s("key1"),
        ])
        .unwrap()
        .into();

        assert_eq!(bender.call(&json!(["a", "b"])).unwrap(), json!("b"));
        assert_eq!(bender.call(&json!(["a"])).unwrap(), json!("a"));
        assert_eq!(bender.call(&json!({"key1": 23})).unwrap(), json!(23));
    }

    #[test]
    fn test_alternation_on_mapping() {
        let bender: Bender = Alternation::new([s("primary"), s("secondary")]).unwrap().into();
        assert_eq!(bender.call(&json!({"secondary": 7})).unwrap(), json!(7));
    }

    #[test]
    fn test_alternation_reraises_last_error() {
        let bender: Bender = Alternation::new([s("primary"), s("secondary")]).unwrap().into();
        let err = bender.call(&json!({})).unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { ref key } if key == "secondary"));

        let bender: Bender = Alternation::new([Bender::select([1]).unwrap()]).unwrap().into();
        assert!(matches!(
            bender.call(&json!([])),
            Err(Error::IndexOutOfBounds { index: 1, length: 0 })
        ));
    }

    #[test]
    fn test_alternation_stops_on_non_lookup_error() {
        let bender: Bender = Alternation::new([
            Bender::constant("a") + Bender::constant(1),
            Bender::constant("fallback"),
        ])
        .unwrap()
        .into();
        assert!(matches!(bender.call(&json!({})), Err(Error::TypeMismatch { .. })));
    }

    fn service_switch() -> Switch {
        Switch::new(
            s("service"),
            [
                ("twitter", s("handle")),
                ("mastodon", s("handle") + Bender::constant("@") + s("server")),
            ],
        )
    }

    #[test]
    fn test_switch_match() {
        let bender: Bender = service_switch().with_default(s("email")).into();

        let twitter = json!({"service": "twitter", "handle": "etandel"});
        assert_eq!(bender.call(&twitter).unwrap(), json!("etandel"));

        let mastodon = json!({
            "service": "mastodon",
            "handle": "etandel",
            "server": "mastodon.social"
        });
        assert_eq!(bender.call(&mastodon).unwrap(), json!("etandel@mastodon.social"));
    }

    #[test]
    fn test_switch_no_match_with_default() {
        let bender: Bender = service_switch().with_default(s("email")).into();
        let source = json!({"service": "facebook", "email": "email@whatever.com"});
        assert_eq!(bender.call(&source).unwrap(), json!("email@whatever.com"));
    }

    #[test]
    fn test_switch_no_match_without_default() {
        let empty: [(&str, Bender); 0] = [];
        let bender: Bender = Switch::new(s("key"), empty).into();
        let err = bender.call(&json!({"key": null})).unwrap_err();
        assert!(err.is_lookup());
        assert!(matches!(err, Error::CaseNotFound { ref key, .. } if key == "null"));
    }

    #[test]
    fn test_switch_keys_are_typed() {
        let bender: Bender = Switch::new(
            s("code"),
            [(json!(1), Bender::constant("one")), (json!("1"), Bender::constant("text one"))],
        )
        .into();
        assert_eq!(bender.call(&json!({"code": 1})).unwrap(), json!("one"));
        assert_eq!(bender.call(&json!({"code": "1"})).unwrap(), json!("text one"));
    }

    #[test]
    fn test_switch_keys_match_numerically() {
        let bender: Bender = Switch::new(
            s("code"),
            [(json!(1), Bender::constant("one")), (json!(2.5), Bender::constant("two and a half"))],
        )
        .into();
        assert_eq!(bender.call(&json!({"code": 1.0})).unwrap(), json!("one"));
        assert_eq!(bender.call(&json!({"code": 2.5})).unwrap(), json!("two and a half"));
        assert!(bender.call(&json!({"code": [1.0]})).unwrap_err().is_lookup());

        let bender: Bender = Switch::new(s("code"), [(json!(2.0), Bender::constant("two"))]).into();
        assert_eq!(bender.call(&json!({"code": 2})).unwrap(), json!("two"));
    }
}
