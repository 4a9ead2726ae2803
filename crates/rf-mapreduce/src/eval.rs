//! Scalar condition evaluator
//!
//! Evaluation is total: unresolved attributes read as `Null`, values of
//! incomparable kinds compare false (and unequal), and conditions are
//! truth-tested after evaluation. Both sides of `and`/`or` are always
//! evaluated; with no side effects and no error paths this is observably
//! the same as short-circuiting.

use rf_algebra::{BinOp, Literal, LiteralKind, ScalarExpr};
use rf_core::{resolve, Tuple};
use serde_json::Value;
use std::cmp::Ordering;

/// Runtime value of a scalar expression
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Convert a tuple value. Nested arrays and objects are compared by
    /// their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => n.as_f64().map_or(Scalar::Null, Scalar::Float),
            },
            Value::String(s) => Scalar::Str(s.clone()),
            other => Scalar::Str(other.to_string()),
        }
    }

    /// Interpret a literal. Numbers without a `.` are integers, with one
    /// they are floats; text that fails to parse stays a string.
    pub fn from_literal(literal: &Literal) -> Self {
        match literal.kind {
            LiteralKind::Str => Scalar::Str(literal.unquoted()),
            LiteralKind::Num if literal.raw.contains('.') => literal
                .raw
                .parse::<f64>()
                .map_or_else(|_| Scalar::Str(literal.raw.clone()), Scalar::Float),
            LiteralKind::Num => literal
                .raw
                .parse::<i64>()
                .map_or_else(|_| Scalar::Str(literal.raw.clone()), Scalar::Int),
        }
    }

    /// Truthiness: null, false, zero and the empty string are false
    pub fn truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Str(s) => !s.is_empty(),
        }
    }

    /// Ordering between two values, `None` when the kinds are incomparable.
    /// Integers and floats compare numerically.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => Some(Ordering::Equal),
            (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Int(a), Scalar::Float(b)) => (*a as f64).partial_cmp(b),
            (Scalar::Float(a), Scalar::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Evaluate `expr` against `tuple`
pub fn evaluate(expr: &ScalarExpr, tuple: &Tuple) -> Scalar {
    match expr {
        ScalarExpr::Attr(attr) => resolve(tuple, &attr.name())
            .value()
            .map_or(Scalar::Null, Scalar::from_json),
        ScalarExpr::Literal(literal) => Scalar::from_literal(literal),
        ScalarExpr::Binary { left, op, right } => {
            let l = evaluate(left, tuple);
            let r = evaluate(right, tuple);
            Scalar::Bool(apply(*op, &l, &r))
        }
    }
}

/// Evaluate a condition and truth-test the result
pub fn holds(cond: &ScalarExpr, tuple: &Tuple) -> bool {
    evaluate(cond, tuple).truthy()
}

fn apply(op: BinOp, l: &Scalar, r: &Scalar) -> bool {
    let ord = l.compare(r);
    match op {
        BinOp::Eq => ord == Some(Ordering::Equal),
        BinOp::Ne => ord != Some(Ordering::Equal),
        BinOp::Lt => ord == Some(Ordering::Less),
        BinOp::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        BinOp::Gt => ord == Some(Ordering::Greater),
        BinOp::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        BinOp::And => l.truthy() && r.truthy(),
        BinOp::Or => l.truthy() || r.truthy(),
    }
}

#[cfg(test)]
#[path = "eval_test.rs"]
mod tests;
