//! Operator semantics over JSON values
//!
//! Truthiness, equality, ordering and arithmetic used by the composed
//! combinators. Integers stay integers while the result is exact; anything
//! else is computed in `f64` and must stay finite.

use crate::error::{Error, Result};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Short name of a value's JSON type, for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a value counts as true in a condition
///
/// `null`, `false`, zero, and empty strings, arrays and objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Num::Int)
                .or_else(|| n.as_f64().map(Num::Float)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn float(result: f64, operation: &str) -> Result<Value> {
    Number::from_f64(result)
        .map(Value::Number)
        .ok_or_else(|| Error::arithmetic(format!("{} produced a non-finite result", operation)))
}

fn mismatch(operation: &str, expected: &str, lhs: &Value, rhs: &Value) -> Error {
    Error::type_mismatch(
        operation,
        expected,
        format!("{} and {}", type_name(lhs), type_name(rhs)),
    )
}

/// Integer arithmetic when both sides are integers and the result fits,
/// `f64` otherwise
fn numeric(
    lhs: Num,
    rhs: Num,
    operation: &str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    if let (Num::Int(a), Num::Int(b)) = (lhs, rhs) {
        if let Some(result) = int_op(a, b) {
            return Ok(Value::from(result));
        }
    }
    float(float_op(lhs.as_f64(), rhs.as_f64()), operation)
}

/// Largest string (in bytes) or array (in elements) a repetition may build
pub const MAX_REPEAT_LEN: usize = 1 << 26;

/// Repetition count, checked so the result stays within [`MAX_REPEAT_LEN`]
///
/// Negative counts, and any count over an empty sequence, repeat zero times.
fn repeat_count(len: usize, times: i64) -> Result<usize> {
    let times = usize::try_from(times).unwrap_or(0);
    if len == 0 {
        return Ok(0);
    }
    match len.checked_mul(times) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(times),
        _ => Err(Error::arithmetic(format!(
            "repeating {} items {} times exceeds the limit of {}",
            len, times, MAX_REPEAT_LEN
        ))),
    }
}

fn repeat<T: Clone>(items: &[T], times: i64) -> Result<Vec<T>> {
    let times = repeat_count(items.len(), times)?;
    let mut out = Vec::with_capacity(items.len() * times);
    for _ in 0..times {
        out.extend_from_slice(items);
    }
    Ok(out)
}

/// `lhs + rhs`: numeric sum, or concatenation of strings and arrays
pub fn add(lhs: &Value, rhs: &Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
        (Value::Array(a), Value::Array(b)) => {
            Ok(Value::Array(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => match (Num::of(lhs), Num::of(rhs)) {
            (Some(a), Some(b)) => numeric(a, b, "addition", i64::checked_add, |x, y| x + y),
            _ => Err(mismatch("+", "numbers, strings or arrays", lhs, rhs)),
        },
    }
}

/// `lhs - rhs`
pub fn sub(lhs: &Value, rhs: &Value) -> Result<Value> {
    match (Num::of(lhs), Num::of(rhs)) {
        (Some(a), Some(b)) => numeric(a, b, "subtraction", i64::checked_sub, |x, y| x - y),
        _ => Err(mismatch("-", "numbers", lhs, rhs)),
    }
}

/// `lhs * rhs`: numeric product, or repetition of a string or array
pub fn mul(lhs: &Value, rhs: &Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            match n.as_i64() {
                Some(times) => Ok(Value::String(s.repeat(repeat_count(s.len(), times)?))),
                None => Err(mismatch("*", "integer repeat count", lhs, rhs)),
            }
        }
        (Value::Array(items), Value::Number(n)) | (Value::Number(n), Value::Array(items)) => {
            match n.as_i64() {
                Some(times) => Ok(Value::Array(repeat(items, times)?)),
                None => Err(mismatch("*", "integer repeat count", lhs, rhs)),
            }
        }
        _ => match (Num::of(lhs), Num::of(rhs)) {
            (Some(a), Some(b)) => numeric(a, b, "multiplication", i64::checked_mul, |x, y| x * y),
            _ => Err(mismatch("*", "numbers", lhs, rhs)),
        },
    }
}

/// `lhs / rhs`
///
/// Exact integer quotients stay integers (`4 / 2 == 2`); anything else is a
/// float (`5 / 2 == 2.5`). Dividing by zero is an arithmetic error.
pub fn div(lhs: &Value, rhs: &Value) -> Result<Value> {
    let (a, b) = match (Num::of(lhs), Num::of(rhs)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(mismatch("/", "numbers", lhs, rhs)),
    };
    if b.as_f64() == 0.0 {
        return Err(Error::arithmetic("division by zero"));
    }
    numeric(
        a,
        b,
        "division",
        |x, y| match x.checked_rem(y) {
            Some(0) => x.checked_div(y),
            _ => None,
        },
        |x, y| x / y,
    )
}

/// `-value`
pub fn neg(value: &Value) -> Result<Value> {
    match Num::of(value) {
        Some(Num::Int(i)) => match i.checked_neg() {
            Some(negated) => Ok(Value::from(negated)),
            None => float(-(i as f64), "negation"),
        },
        Some(Num::Float(f)) => float(-f, "negation"),
        None => Err(Error::type_mismatch("unary -", "number", type_name(value))),
    }
}

/// Structural equality where `2` and `2.0` are the same number
pub fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(_), Value::Number(_)) => match (Num::of(lhs), Num::of(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => lhs == rhs,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| loose_eq(v, other)))
        }
        _ => lhs == rhs,
    }
}

fn partial_compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(_), Value::Number(_)) => match (Num::of(lhs)?, Num::of(rhs)?) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                if !loose_eq(x, y) {
                    return partial_compare(x, y);
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        _ => None,
    }
}

/// Order two values of the same kind
///
/// Numbers compare numerically, strings lexicographically and arrays
/// element by element. Other combinations cannot be ordered.
pub fn compare(operation: &str, lhs: &Value, rhs: &Value) -> Result<Ordering> {
    partial_compare(lhs, rhs)
        .ok_or_else(|| mismatch(operation, "two numbers, strings, booleans or arrays", lhs, rhs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(-1), json!(0.5), json!("a"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        assert_eq!(add(&json!(5), &json!(2)).unwrap(), json!(7));
        assert_eq!(sub(&json!(5), &json!(2)).unwrap(), json!(3));
        assert_eq!(mul(&json!(5), &json!(2)).unwrap(), json!(10));
        assert_eq!(div(&json!(4), &json!(2)).unwrap(), json!(2));
    }

    #[test]
    fn test_division_promotes_to_float() {
        assert_eq!(div(&json!(5), &json!(2)).unwrap(), json!(2.5));
        assert_eq!(div(&json!(1.5), &json!(0.5)).unwrap(), json!(3.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(div(&json!(1), &json!(0)), Err(Error::Arithmetic { .. })));
        assert!(matches!(div(&json!(1), &json!(0.0)), Err(Error::Arithmetic { .. })));
    }

    #[test]
    fn test_overflow_falls_back_to_float() {
        let sum = add(&json!(i64::MAX), &json!(1)).unwrap();
        assert!(sum.is_f64());
    }

    #[test]
    fn test_concatenation_and_repetition() {
        assert_eq!(add(&json!("etandel"), &json!("@")).unwrap(), json!("etandel@"));
        assert_eq!(add(&json!([1]), &json!([2, 3])).unwrap(), json!([1, 2, 3]));
        assert_eq!(mul(&json!("ab"), &json!(3)).unwrap(), json!("ababab"));
        assert_eq!(mul(&json!(2), &json!([0])).unwrap(), json!([0, 0]));
        assert_eq!(mul(&json!("ab"), &json!(-1)).unwrap(), json!(""));
    }

    #[test]
    fn test_oversized_repetition_is_an_error() {
        assert!(matches!(
            mul(&json!("abc"), &json!(i64::MAX)),
            Err(Error::Arithmetic { .. })
        ));
        assert!(matches!(
            mul(&json!([1, 2]), &json!(i64::MAX)),
            Err(Error::Arithmetic { .. })
        ));
        assert!(matches!(
            mul(&json!(MAX_REPEAT_LEN + 1), &json!("x")),
            Err(Error::Arithmetic { .. })
        ));
        assert_eq!(mul(&json!(""), &json!(i64::MAX)).unwrap(), json!(""));
        assert_eq!(mul(&json!([]), &json!(i64::MAX)).unwrap(), json!([]));
    }

    #[test]
    fn test_mixed_types_rejected() {
        let err = add(&json!("a"), &json!(1)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(err.to_string().contains("string and number"));
    }

    #[test]
    fn test_negation() {
        assert_eq!(neg(&json!(1)).unwrap(), json!(-1));
        assert_eq!(neg(&json!(-1)).unwrap(), json!(1));
        assert_eq!(neg(&json!(2.5)).unwrap(), json!(-2.5));
        assert!(neg(&json!("1")).is_err());
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_eq(&json!(2), &json!(2.0)));
        assert!(loose_eq(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
        assert!(!loose_eq(&json!(42), &json!(27)));
        assert!(!loose_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(compare("<", &json!(1), &json!(2.5)).unwrap(), Ordering::Less);
        assert_eq!(compare("<", &json!("b"), &json!("a")).unwrap(), Ordering::Greater);
        assert_eq!(compare("<", &json!([1, 2]), &json!([1, 2, 0])).unwrap(), Ordering::Less);
        assert!(compare("<", &json!(1), &json!("1")).is_err());
    }
}
