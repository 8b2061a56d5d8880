//! `coerce` (lift to at least the other rank) and `convert` (explicit
//! conversion table between ranks).

use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use super::format::nice_float;
use super::regex_value::{RegexFlags, RegexValue};
use super::{BlockValue, Rank, Value};
use crate::error::{Error, Result};
use crate::lexer;
use crate::scope::Scope;

/// Lift `a` to at least `rank(b)`; identity if `a` already outranks `b`.
pub fn coerce(a: &Value, b: &Value) -> Result<Value> {
    if a.rank() >= b.rank() {
        return Ok(a.clone());
    }
    convert(a, b.rank())
}

/// Explicit conversion to `target`'s rank, following the table in spec
/// §4.3. Fails with `CoercionError` where the table has no entry.
pub fn convert(v: &Value, target: Rank) -> Result<Value> {
    if v.rank() == target {
        return Ok(v.clone());
    }
    let out = match (v, target) {
        // ---- from Int ----
        (Value::Int(n), Rank::Float) => Some(Value::Float(bigint_to_f64(n))),
        (Value::Int(n), Rank::Complex) => Some(Value::Complex(bigint_to_f64(n), 0.0)),
        (Value::Int(_), Rank::List) => Some(Value::list(vec![v.clone()])),
        (Value::Int(n), Rank::Str) => Some(Value::str(int_to_str(n))),
        (Value::Int(n), Rank::Regex) => Some(Value::Regex(Rc::new(RegexValue::new(
            regex::escape(&int_to_str(n)),
            RegexFlags::empty(),
        )?))),
        (Value::Int(n), Rank::Block) => Some(reconstructed_block(&n.to_string())?),

        // ---- from Float ----
        (Value::Float(f), Rank::Int) => Some(Value::Int(float_to_bigint_trunc(*f))),
        (Value::Float(f), Rank::Complex) => Some(Value::Complex(*f, 0.0)),
        (Value::Float(_), Rank::List) => Some(Value::list(vec![v.clone()])),
        (Value::Float(f), Rank::Str) => Some(Value::str(nice_float(*f))),
        (Value::Float(f), Rank::Regex) => Some(Value::Regex(Rc::new(RegexValue::new(
            regex::escape(&nice_float(*f)),
            RegexFlags::empty(),
        )?))),
        (Value::Float(f), Rank::Block) => Some(reconstructed_block(&nice_float(*f))?),

        // ---- from Complex ----
        // No direct entry for Complex->Int/Float; `simplify` is the
        // sanctioned route and only succeeds when the value is exactly
        // representable in the target rank.
        (Value::Complex(..), Rank::Int | Rank::Float) => {
            let simplified = v.simplify();
            if simplified.rank() == target {
                Some(simplified)
            } else {
                None
            }
        }
        (Value::Complex(..), Rank::List) => Some(Value::list(vec![v.clone()])),
        (Value::Complex(re, im), Rank::Str) => Some(Value::str(complex_to_str(*re, *im))),
        (Value::Complex(re, im), Rank::Regex) => Some(Value::Regex(Rc::new(RegexValue::new(
            regex::escape(&complex_to_str(*re, *im)),
            RegexFlags::empty(),
        )?))),
        (Value::Complex(re, im), Rank::Block) => {
            Some(reconstructed_block(&complex_to_str(*re, *im))?)
        }

        // ---- from List ----
        (Value::List(items), Rank::Str) => {
            let mut s = String::new();
            for item in items.iter() {
                s.push_str(&value_to_plain_str(&convert(item, Rank::Str)?)?);
            }
            Some(Value::str(s))
        }
        (Value::List(items), Rank::Regex) => {
            let mut pattern = String::new();
            for item in items.iter() {
                let r = convert(item, Rank::Regex)?;
                pattern.push_str(&regex_pattern_of(&r)?);
            }
            Some(Value::Regex(Rc::new(RegexValue::new(
                pattern,
                RegexFlags::empty(),
            )?)))
        }
        (Value::List(items), Rank::Block) => {
            let mut tokens = Vec::new();
            for item in items.iter() {
                let block = convert(item, Rank::Block)?;
                if let Value::Block(b) = block {
                    tokens.extend(b.tokens.iter().cloned());
                }
            }
            Some(Value::Block(Rc::new(BlockValue {
                tokens: Rc::new(tokens),
                captured_scope: Scope::new_root(),
                scoped: true,
            })))
        }

        // ---- from Str ----
        (Value::Str(s), Rank::Int) => Some(parse_numeric_literal(s, Rank::Int)?),
        (Value::Str(s), Rank::Float) => Some(parse_numeric_literal(s, Rank::Float)?),
        (Value::Str(s), Rank::Complex) => Some(parse_numeric_literal(s, Rank::Complex)?),
        (Value::Str(s), Rank::List) => Some(Value::list(
            s.chars()
                .map(|c| Value::Int(BigInt::from(c as u32)))
                .collect(),
        )),
        (Value::Str(s), Rank::Regex) => Some(Value::Regex(Rc::new(RegexValue::new(
            s.as_str(),
            RegexFlags::empty(),
        )?))),
        (Value::Str(s), Rank::Block) => Some(reconstructed_block(s)?),

        // ---- from Regex ----
        (Value::Regex(r), Rank::List) => Some(Value::list(
            r.pattern
                .chars()
                .map(|c| Value::Int(BigInt::from(c as u32)))
                .collect(),
        )),
        (Value::Regex(r), Rank::Str) => Some(Value::str(r.pattern.clone())),
        (Value::Regex(r), Rank::Block) => Some(reconstructed_block(&r.pattern)?),

        // ---- from Block ----
        (Value::Block(b), Rank::List) => Some(Value::list(
            b.tokens.iter().map(|t| Value::str(t.raw.clone())).collect(),
        )),
        (Value::Block(b), Rank::Str | Rank::Regex) => {
            let text = b.source_text();
            if target == Rank::Str {
                Some(Value::str(text))
            } else {
                Some(Value::Regex(Rc::new(RegexValue::new(
                    regex::escape(&text),
                    RegexFlags::empty(),
                )?)))
            }
        }

        // Builtin always coerces to its own simplified Block-equivalent
        // regardless of target rank: the Func group treats Builtin as an
        // equivalent Block.
        (Value::Builtin(_), _) => return Ok(v.simplify()),

        _ => None,
    };
    out.ok_or(Error::Coercion {
        from: v.rank(),
        to: target,
    })
}

fn bigint_to_f64(n: &BigInt) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}

/// Equality between an arbitrary-precision Int and a double, used by the
/// cross-type numeric equality rule in `value::ord_eq`.
pub(crate) fn bigint_eq_f64(n: &BigInt, f: f64) -> bool {
    if !f.is_finite() || f.fract() != 0.0 {
        return false;
    }
    match BigInt::from_f64(f) {
        Some(as_int) => &as_int == n,
        None => false,
    }
}

fn float_to_bigint_trunc(f: f64) -> BigInt {
    if !f.is_finite() {
        return BigInt::zero();
    }
    BigInt::from(f.trunc() as i64)
}

/// Int→Str: a character if the integer is in Unicode scalar range,
/// otherwise its decimal digits.
fn int_to_str(n: &BigInt) -> String {
    if let Some(code) = n.to_u32() {
        if let Some(c) = char::from_u32(code) {
            return c.to_string();
        }
    }
    n.to_string()
}

fn complex_to_str(re: f64, im: f64) -> String {
    let sign = if im < 0.0 { "-" } else { "+" };
    format!("({}{}{}j)", nice_float(re), sign, nice_float(im.abs()))
}

fn value_to_plain_str(v: &Value) -> Result<String> {
    match v {
        Value::Str(s) => Ok(s.as_str().to_string()),
        _ => unreachable!("convert(_, Rank::Str) always yields Value::Str"),
    }
}

fn regex_pattern_of(v: &Value) -> Result<String> {
    match v {
        Value::Regex(r) => Ok(r.pattern.clone()),
        _ => unreachable!("convert(_, Rank::Regex) always yields Value::Regex"),
    }
}

fn reconstructed_block(literal_text: &str) -> Result<Value> {
    let tokens = lexer::tokenize(literal_text)?;
    Ok(Value::Block(Rc::new(BlockValue {
        tokens: Rc::new(tokens),
        captured_scope: Scope::new_root(),
        scoped: true,
    })))
}

fn parse_numeric_literal(s: &str, target: Rank) -> Result<Value> {
    let trimmed = s.trim();
    let parsed = if let Ok(n) = trimmed.parse::<BigInt>() {
        Value::Int(n)
    } else if let Ok(f) = trimmed.parse::<f64>() {
        Value::Float(f)
    } else {
        return Err(Error::Value {
            message: format!("cannot parse `{s}` as a number"),
        });
    };
    convert(&parsed, target)
}
