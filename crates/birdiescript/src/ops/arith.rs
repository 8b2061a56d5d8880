//! `+ - * / %`: numeric arithmetic, sequence/set shapes, and the
//! Func-involving fold/partition/scan/each variants they fall back to.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use super::{commonize, invoke, is_func, is_num, is_seq, pop_pair, seq_elements, seq_from_elements, seq_kind, type_error, SeqKind};
use crate::context::{Context, Machine};
use crate::error::{Error, Result};
use crate::value::{Rank, RegexFlags, RegexValue, Value};

fn numeric_binop(
    a: Value,
    b: Value,
    op: &'static str,
    int_op: impl Fn(&BigInt, &BigInt) -> Result<BigInt>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
    let (a, b) = commonize(a, b)?;
    match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(int_op(x, y)?)),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(float_op(*x, *y))),
        (Value::Complex(xr, xi), Value::Complex(yr, yi)) => match op {
            "+" => Ok(Value::Complex(xr + yr, xi + yi)),
            "-" => Ok(Value::Complex(xr - yr, xi - yi)),
            "*" => Ok(Value::Complex(xr * yr - xi * yi, xr * yi + xi * yr)),
            "/" => {
                let denom = yr * yr + yi * yi;
                if denom == 0.0 {
                    Ok(Value::Complex(f64::NAN, f64::NAN))
                } else {
                    Ok(Value::Complex(
                        (xr * yr + xi * yi) / denom,
                        (xi * yr - xr * yi) / denom,
                    ))
                }
            }
            _ => Err(type_error(op, &a, &b)),
        },
        _ => Err(type_error(op, &a, &b)),
    }
}

pub fn add(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let (a, b) = pop_pair(machine);
    if is_func(&a) && is_func(&b) {
        machine.push(compose(&a, &b)?);
        return Ok(());
    }
    // Unconditional commonize before classifying: this is what makes a
    // bare number append/prepend to a sequence (promoted to a one-element
    // Seq of the same kind) and lets two different Seq kinds concatenate
    // (the lower-ranked one promoted up to the higher's kind first).
    let (a, b) = commonize(a, b)?;
    let result = match (&a, &b) {
        (Value::Int(..), Value::Int(..)) | (Value::Float(..), Value::Float(..)) | (Value::Complex(..), Value::Complex(..)) => {
            numeric_binop(a, b, "+", |x, y| Ok(x + y), |x, y| x + y)?
        }
        (Value::Regex(x), Value::Regex(y)) => Value::Regex(std::rc::Rc::new(x.merge(y)?)),
        _ if is_seq(&a) && is_seq(&b) && seq_kind(&a) == seq_kind(&b) => concat_seq(&a, &b)?,
        _ => return Err(type_error("+", &a, &b)),
    };
    machine.push(result);
    Ok(())
}

fn concat_seq(a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            let mut v = x.as_ref().clone();
            v.extend(y.iter().cloned());
            Ok(Value::list(v))
        }
        (Value::Str(x), Value::Str(y)) => Ok(Value::str(format!("{x}{y}"))),
        (Value::Regex(x), Value::Regex(y)) => Ok(Value::Regex(std::rc::Rc::new(x.merge(y)?))),
        _ => Err(type_error("+", a, b)),
    }
}

use super::compose;

pub fn sub(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (mut a, mut b) = pop_pair(machine);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_num(&a) && is_num(&b) {
        let result = numeric_binop(a, b, "-", |x, y| Ok(x - y), |x, y| x - y)?;
        machine.push(result);
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        for elem in seq_elements(&b)? {
            machine.push(elem);
            invoke(machine, ctx, &a)?;
        }
        return Ok(());
    }
    if is_seq(&a) && is_seq(&b) && seq_kind(&a) == seq_kind(&b) {
        let left = seq_elements(&a)?;
        let right = seq_elements(&b)?;
        let kept: Vec<Value> = left
            .into_iter()
            .filter(|x| !right.iter().any(|y| x == y))
            .collect();
        let result = seq_from_elements(&a, kept)?;
        machine.push(result);
        return Ok(());
    }
    Err(type_error("-", &a, &b))
}

pub fn mul(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (mut a, mut b) = pop_pair(machine);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_num(&a) && is_num(&b) {
        let result = numeric_binop(a, b, "*", |x, y| Ok(x * y), |x, y| x * y)?;
        machine.push(result);
        return Ok(());
    }
    if is_seq(&a) && matches!(b.rank(), Rank::Int | Rank::Float) {
        let n = to_isize(&b)?;
        let result = repeat_seq(&a, n)?;
        machine.push(result);
        return Ok(());
    }
    if is_func(&a) && matches!(b.rank(), Rank::Int | Rank::Float) {
        let n = to_isize(&b)?.max(0);
        for _ in 0..n {
            invoke(machine, ctx, &a)?;
        }
        return Ok(());
    }
    if is_seq(&a) && is_seq(&b) {
        let result = join_seq(&a, &b)?;
        machine.push(result);
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        let mut elements = seq_elements(&b)?.into_iter();
        let Some(first) = elements.next() else {
            return Err(Error::Value {
                message: "fold over an empty sequence".to_string(),
            });
        };
        machine.push(first);
        for elem in elements {
            machine.push(elem);
            invoke(machine, ctx, &a)?;
        }
        return Ok(());
    }
    if is_func(&a) && is_func(&b) {
        let result = compose(&a, &b)?;
        machine.push(result);
        return Ok(());
    }
    Err(type_error("*", &a, &b))
}

fn to_isize(v: &Value) -> Result<isize> {
    match v {
        Value::Int(n) => n.to_isize().ok_or_else(|| Error::Value {
            message: "integer too large for a repeat/chunk count".to_string(),
        }),
        Value::Float(f) => Ok(*f as isize),
        _ => Err(type_error("*", v, v)),
    }
}

fn repeat_seq(a: &Value, n: isize) -> Result<Value> {
    let reps = n.unsigned_abs();
    match a {
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len() * reps);
            for _ in 0..reps {
                out.extend(items.iter().cloned());
            }
            if n < 0 {
                out.reverse();
            }
            Ok(Value::list(out))
        }
        Value::Str(s) => {
            let mut out = s.repeat(reps);
            if n < 0 {
                out = out.chars().rev().collect();
            }
            Ok(Value::str(out))
        }
        Value::Regex(r) => Ok(Value::Regex(std::rc::Rc::new(r.repeated(reps)?))),
        other => Err(type_error("*", other, other)),
    }
}

/// Join: intersperse `b`'s elements between `a`'s. Result kind follows the
/// fixed 3×3 sub-table (List+List→List, List+Str→Str, Str+List→Str, ...),
/// i.e. whichever of the two is NOT List wins, and List+List stays List.
fn join_seq(a: &Value, b: &Value) -> Result<Value> {
    let result_kind = match (seq_kind(a), seq_kind(b)) {
        (Some(SeqKind::List), Some(SeqKind::List)) => SeqKind::List,
        (Some(SeqKind::List), Some(other)) | (Some(other), Some(SeqKind::List)) => other,
        (Some(ka), Some(_)) => ka,
        _ => return Err(type_error("*", a, b)),
    };
    let left = seq_elements(a)?;
    let sep = seq_elements(b)?;
    let mut out = Vec::new();
    for (i, elem) in left.into_iter().enumerate() {
        if i > 0 {
            out.extend(sep.iter().cloned());
        }
        out.push(elem);
    }
    let like = match result_kind {
        SeqKind::List => Value::list(vec![]),
        SeqKind::Str => Value::str(""),
        SeqKind::Regex => Value::Regex(std::rc::Rc::new(RegexValue::new("", RegexFlags::empty())?)),
    };
    seq_from_elements(&like, out)
}

pub fn div(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (mut a, mut b) = pop_pair(machine);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_num(&a) && is_num(&b) {
        let result = numeric_binop(
            a,
            b,
            "/",
            |x, y| {
                if y.is_zero() {
                    Err(Error::Value {
                        message: "division by zero".to_string(),
                    })
                } else {
                    Ok(x / y)
                }
            },
            |x, y| x / y,
        )?;
        machine.push(result);
        return Ok(());
    }
    if is_seq(&a) && matches!(b.rank(), Rank::Int | Rank::Float) {
        let n = to_isize(&b)?;
        if n == 0 {
            return Err(Error::Value {
                message: "chunk size must not be zero".to_string(),
            });
        }
        let elements = seq_elements(&a)?;
        let size = n.unsigned_abs();
        let mut chunks: Vec<Value> = elements
            .chunks(size)
            .map(|chunk| seq_from_elements(&a, chunk.to_vec()))
            .collect::<Result<Vec<_>>>()?;
        if n < 0 {
            chunks.reverse();
        }
        machine.push(Value::list(chunks));
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        let mut pass = Vec::new();
        let mut fail = Vec::new();
        for elem in seq_elements(&b)? {
            machine.push(elem.clone());
            invoke(machine, ctx, &a)?;
            let verdict = machine.pop();
            if verdict.truthy() {
                pass.push(elem);
            } else {
                fail.push(elem);
            }
        }
        let pass = seq_from_elements(&b, pass)?;
        let fail = seq_from_elements(&b, fail)?;
        machine.push(Value::list(vec![pass, fail]));
        return Ok(());
    }
    if is_seq(&a) && is_seq(&b) && seq_kind(&a) == seq_kind(&b) {
        let mut raw = split_seq_raw(&a, &b)?;
        // Split (unlike SplitNoEmpty) keeps interior empty pieces but
        // trims a leading/trailing one, matching the worked scenario
        // (`ababab` split on `a` yields 3 pieces, not a leading empty
        // piece followed by 3 more).
        if raw.first().is_some_and(Vec::is_empty) {
            raw.remove(0);
        }
        if raw.last().is_some_and(Vec::is_empty) {
            raw.pop();
        }
        let pieces = raw
            .into_iter()
            .map(|piece| seq_from_elements(&a, piece))
            .collect::<Result<Vec<_>>>()?;
        machine.push(Value::list(pieces));
        return Ok(());
    }
    Err(type_error("/", &a, &b))
}

/// Split `a` around every non-overlapping occurrence of `b`, left to
/// right, returning the raw element runs between matches (including empty
/// runs where `b` occurs at the start, end, or back-to-back).
fn split_seq_raw(a: &Value, b: &Value) -> Result<Vec<Vec<Value>>> {
    let hay = seq_elements(a)?;
    let needle = seq_elements(b)?;
    if needle.is_empty() {
        return Err(Error::Value {
            message: "cannot split on an empty sequence".to_string(),
        });
    }
    let mut pieces = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;
    while i < hay.len() {
        if hay[i..].len() >= needle.len() && hay[i..i + needle.len()] == needle[..] {
            pieces.push(std::mem::take(&mut current));
            i += needle.len();
        } else {
            current.push(hay[i].clone());
            i += 1;
        }
    }
    pieces.push(current);
    Ok(pieces)
}

pub fn modulo(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (mut a, mut b) = pop_pair(machine);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_num(&a) && is_num(&b) {
        let result = numeric_binop(
            a,
            b,
            "%",
            |x, y| {
                if y.is_zero() {
                    Err(Error::Value {
                        message: "modulo by zero".to_string(),
                    })
                } else {
                    Ok(x.mod_floor(y))
                }
            },
            |x, y| x.rem_euclid(y),
        )?;
        machine.push(result);
        return Ok(());
    }
    if is_seq(&a) && matches!(b.rank(), Rank::Int | Rank::Float) {
        let n = to_isize(&b)?;
        if n == 0 {
            return Err(Error::Value {
                message: "stride must not be zero".to_string(),
            });
        }
        let elements = seq_elements(&a)?;
        let step = n.unsigned_abs();
        let strided: Vec<Value> = if n > 0 {
            elements.into_iter().step_by(step).collect()
        } else {
            let mut v: Vec<Value> = elements.into_iter().rev().step_by(step).collect();
            v.reverse();
            v
        };
        let result = seq_from_elements(&a, strided)?;
        machine.push(result);
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        let mut elements = seq_elements(&b)?.into_iter();
        let Some(first) = elements.next() else {
            machine.push(Value::list(vec![]));
            return Ok(());
        };
        let mut accs = vec![first.clone()];
        machine.push(first);
        for elem in elements {
            machine.push(elem);
            invoke(machine, ctx, &a)?;
            let acc = machine.peek(-1);
            accs.push(acc);
        }
        machine.pop();
        machine.push(Value::list(accs));
        return Ok(());
    }
    if is_seq(&a) && is_seq(&b) && seq_kind(&a) == seq_kind(&b) {
        let raw = split_seq_raw(&a, &b)?;
        let pieces = raw
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .map(|piece| seq_from_elements(&a, piece))
            .collect::<Result<Vec<_>>>()?;
        machine.push(Value::list(pieces));
        return Ok(());
    }
    Err(type_error("%", &a, &b))
}
