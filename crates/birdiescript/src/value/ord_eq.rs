//! Equality and ordering: loose cross-rank numeric/structural
//! equality via `PartialEq`, and a fallible `compare` for the `<`/`>`
//! operator table since cross-group comparisons are a TypeError rather than
//! an infallible ordering.

use std::cmp::Ordering;

use super::{Rank, Value};
use crate::error::{Error, Result};

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let a = self.simplify();
        let b = other.simplify();
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
                crate::value::convert::bigint_eq_f64(x, *y)
            }
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Complex(xr, xi), Value::Complex(yr, yi)) => xr == yr && xi == yi,
            (Value::Int(x), Value::Complex(re, im)) | (Value::Complex(re, im), Value::Int(x)) => {
                *im == 0.0 && crate::value::convert::bigint_eq_f64(x, *re)
            }
            (Value::Float(x), Value::Complex(re, im))
            | (Value::Complex(re, im), Value::Float(x)) => *im == 0.0 && x == re,
            (Value::List(x), Value::List(y)) => x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| p == q),
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Regex(x), Value::Regex(y)) => x.pattern == y.pattern && x.flags == y.flags,
            (Value::Block(x), Value::Block(y)) => x.source_text() == y.source_text(),
            (Value::Builtin(x), Value::Builtin(y)) => std::ptr::eq(*x, *y),
            _ => false,
        }
    }
}

/// `strict_eq` additionally requires equal ranks.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    a.rank() == b.rank() && a == b
}

/// Ordering within Num or within Seq; Regex compares `(pattern, flags)`;
/// Block compares textual form. Cross-group comparisons are a TypeError.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering> {
    let ra = a.rank();
    let rb = b.rank();
    if ra.is_num() && rb.is_num() {
        return compare_num(a, b);
    }
    if ra.is_seq() && rb.is_seq() {
        return compare_seq(a, b);
    }
    if ra == Rank::Block && rb == Rank::Block {
        if let (Value::Block(x), Value::Block(y)) = (a, b) {
            return Ok(x.source_text().cmp(&y.source_text()));
        }
    }
    Err(Error::Type {
        operator: "<",
        ranks: vec![ra, rb],
    })
}

fn compare_num(a: &Value, b: &Value) -> Result<Ordering> {
    let a = a.simplify();
    let b = b.simplify();
    let (af, bf) = match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => return Ok(x.cmp(y)),
        _ => (numeric_as_f64(&a)?, numeric_as_f64(&b)?),
    };
    af.partial_cmp(&bf).ok_or(Error::Value {
        message: "cannot order NaN".to_string(),
    })
}

fn numeric_as_f64(v: &Value) -> Result<f64> {
    match v {
        Value::Int(n) => Ok(num_traits::ToPrimitive::to_f64(n).unwrap_or(f64::NAN)),
        Value::Float(f) => Ok(*f),
        Value::Complex(re, im) if *im == 0.0 => Ok(*re),
        _ => Err(Error::Type {
            operator: "<",
            ranks: vec![v.rank()],
        }),
    }
}

fn compare_seq(a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Regex(x), Value::Regex(y)) => {
            Ok((x.pattern.as_str(), x.flags.letters()).cmp(&(y.pattern.as_str(), y.flags.letters())))
        }
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        (Value::List(x), Value::List(y)) => {
            for (p, q) in x.iter().zip(y.iter()) {
                let ord = compare(p, q)?;
                if ord != Ordering::Equal {
                    return Ok(ord);
                }
            }
            Ok(x.len().cmp(&y.len()))
        }
        _ => {
            let target = a.rank().max(b.rank());
            let ca = super::convert::convert(a, target)?;
            let cb = super::convert::convert(b, target)?;
            compare_seq(&ca, &cb)
        }
    }
}
