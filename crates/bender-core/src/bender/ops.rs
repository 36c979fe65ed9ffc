//! Operators over combinators
//!
//! `+ - * / & | ! -` and the pipe operators `>>` / `<<` build composite
//! [`Bender`]s. None of them short-circuit: both operands are always
//! evaluated before the operator is applied.

use super::Bender;
use crate::error::Result;
use crate::value;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Not, Shl, Shr, Sub};

/// Binary operator of a composite combinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// Apply the operator to two evaluated operands
    pub fn apply(self, lhs: &Value, rhs: &Value) -> Result<Value> {
        let ordered = |accept: fn(Ordering) -> bool| -> Result<Value> {
            Ok(Value::Bool(accept(value::compare(self.symbol(), lhs, rhs)?)))
        };

        match self {
            BinaryOp::Add => value::add(lhs, rhs),
            BinaryOp::Sub => value::sub(lhs, rhs),
            BinaryOp::Mul => value::mul(lhs, rhs),
            BinaryOp::Div => value::div(lhs, rhs),
            BinaryOp::Eq => Ok(Value::Bool(value::loose_eq(lhs, rhs))),
            BinaryOp::Ne => Ok(Value::Bool(!value::loose_eq(lhs, rhs))),
            BinaryOp::Lt => ordered(Ordering::is_lt),
            BinaryOp::Le => ordered(Ordering::is_le),
            BinaryOp::Gt => ordered(Ordering::is_gt),
            BinaryOp::Ge => ordered(Ordering::is_ge),
            BinaryOp::And => Ok(Value::Bool(value::is_truthy(lhs) && value::is_truthy(rhs))),
            BinaryOp::Or => Ok(Value::Bool(value::is_truthy(lhs) || value::is_truthy(rhs))),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary operator of a composite combinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation
    Neg,
    /// Logical negation of truthiness
    Not,
}

impl UnaryOp {
    pub fn apply(self, operand: &Value) -> Result<Value> {
        match self {
            UnaryOp::Neg => value::neg(operand),
            UnaryOp::Not => Ok(Value::Bool(!value::is_truthy(operand))),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<B: Into<Bender>> $trait<B> for Bender {
            type Output = Bender;

            fn $method(self, rhs: B) -> Bender {
                Bender::binary($op, self, rhs)
            }
        }
    };
}

binary_operator!(Add, add, BinaryOp::Add);
binary_operator!(Sub, sub, BinaryOp::Sub);
binary_operator!(Mul, mul, BinaryOp::Mul);
binary_operator!(Div, div, BinaryOp::Div);
binary_operator!(BitAnd, bitand, BinaryOp::And);
binary_operator!(BitOr, bitor, BinaryOp::Or);

impl Neg for Bender {
    type Output = Bender;

    fn neg(self) -> Bender {
        Bender::unary(UnaryOp::Neg, self)
    }
}

impl Not for Bender {
    type Output = Bender;

    fn not(self) -> Bender {
        Bender::unary(UnaryOp::Not, self)
    }
}

/// `a >> b` is `a.then(b)`
impl<B: Into<Bender>> Shr<B> for Bender {
    type Output = Bender;

    fn shr(self, next: B) -> Bender {
        self.then(next)
    }
}

/// `b << a` is `b.after(a)`
impl<B: Into<Bender>> Shl<B> for Bender {
    type Output = Bender;

    fn shl(self, previous: B) -> Bender {
        self.after(previous)
    }
}
