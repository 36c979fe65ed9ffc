//! Property-based testing strategies for generating documents and templates
//!
//! Generates random JSON documents and combinator-free templates, and checks
//! the invariants of the value operators and the structural evaluator
//! against them.

#![cfg(test)]

use crate::path::Slice;
use crate::template::{bend, Template};
use crate::value;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating JSON scalars
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        (-1000.0f64..1000.0).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 _-]{0,16}".prop_map(Value::String),
    ]
}

/// Strategy for generating arbitrary nested JSON documents
pub fn json_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::Array),
            vec(("[a-z]{1,8}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Strategy for generating templates with no combinators
pub fn static_template_strategy() -> impl Strategy<Value = Template> {
    json_strategy()
        .prop_map(Template::from)
        .prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                vec(inner.clone(), 0..4).prop_map(Template::Array),
                vec(("[a-z]{1,8}", inner), 0..4).prop_map(|entries| {
                    // Duplicate keys would collapse in the output object
                    let mut seen = std::collections::HashSet::new();
                    Template::Object(
                        entries
                            .into_iter()
                            .filter(|(key, _)| seen.insert(key.clone()))
                            .collect(),
                    )
                }),
            ]
        })
}

/// The document a static template is expected to produce
fn expected(template: &Template) -> Value {
    match template {
        Template::Value(value) => value.clone(),
        Template::Array(elements) => Value::Array(elements.iter().map(expected).collect()),
        Template::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, t)| (key.clone(), expected(t)))
                .collect(),
        ),
        Template::Bender(_) => unreachable!("static templates hold no combinators"),
    }
}

proptest! {
    #[test]
    fn prop_static_templates_bend_to_themselves(
        template in static_template_strategy(),
        document in json_strategy(),
    ) {
        prop_assert!(template.is_static());
        let out = bend(&template, &document, None).unwrap();
        prop_assert_eq!(out, expected(&template));
    }

    #[test]
    fn prop_truthiness_matches_negation(v in json_strategy()) {
        let negated = crate::bender::UnaryOp::Not.apply(&v).unwrap();
        prop_assert_eq!(negated, Value::Bool(!value::is_truthy(&v)));
    }

    #[test]
    fn prop_integer_addition_is_exact(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        prop_assert_eq!(value::add(&json!(a), &json!(b)).unwrap(), json!(a + b));
        prop_assert_eq!(value::sub(&json!(a), &json!(b)).unwrap(), json!(a - b));
    }

    #[test]
    fn prop_loose_eq_is_reflexive(v in json_strategy()) {
        prop_assert!(value::loose_eq(&v, &v));
    }

    #[test]
    fn prop_slice_indices_in_bounds(
        len in 0usize..40,
        start in option::of(-50i64..50),
        end in option::of(-50i64..50),
        step in prop_oneof![-5i64..=-1, 1i64..=5],
    ) {
        let slice = Slice::new(start, end, step).unwrap();
        let picked = slice.indices(len);
        prop_assert!(picked.iter().all(|&i| i < len));
        if step > 0 {
            prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
        } else {
            prop_assert!(picked.windows(2).all(|w| w[0] > w[1]));
        }
    }

    #[test]
    fn prop_full_slice_is_identity(items in vec(scalar_strategy(), 0..20)) {
        let array = Value::Array(items.clone());
        prop_assert_eq!(Slice::range(None, None).apply(&array).unwrap(), array);

        let reversed = Slice::new(None, None, -1).unwrap().apply(&Value::Array(items.clone())).unwrap();
        let mut backwards = items;
        backwards.reverse();
        prop_assert_eq!(reversed, Value::Array(backwards));
    }
}
