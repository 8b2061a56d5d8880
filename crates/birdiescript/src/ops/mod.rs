//! The overloaded operator table: arithmetic, bitwise/set,
//! comparison, unary, and control-flow handlers, plus the shared
//! pop-two/commonize/symmetric-fallback machinery they're all built from.

pub mod arith;
pub mod bitwise;
pub mod compare;
pub mod control;
pub mod unary;

use crate::context::{apply_value, Context, Machine};
use crate::error::{Error, Result};
use crate::value::{coerce, Rank, Value};

/// Pop the operator's two operands off the stack: `b` is popped first (it
/// is the shallower, top-of-stack operand), `a` is the deeper one.
/// Returned as `(a, b)`.
pub fn pop_pair(machine: &mut Machine) -> (Value, Value) {
    let b = machine.pop();
    let a = machine.pop();
    (a, b)
}

/// Lift both operands to the higher of their two ranks ("commonize"). Used
/// by same-group binary arithmetic once a Num/Num or Seq/Seq pair has been
/// identified.
pub fn commonize(a: Value, b: Value) -> Result<(Value, Value)> {
    let ca = coerce(&a, &b)?;
    let cb = coerce(&b, &a)?;
    Ok((ca, cb))
}

/// Invoke `f` (Block or Builtin) against the running Context, leaving
/// whatever it pushes on the stack. Non-invocable values push themselves
/// (spec: "Most values push themselves").
pub fn invoke(machine: &mut Machine, ctx: &mut Context, f: &Value) -> Result<()> {
    apply_value(machine, ctx, f, false)
}

/// The standard "no arm matched, and no symmetric fallback applies either"
/// failure for a binary operator.
pub fn type_error(operator: &'static str, a: &Value, b: &Value) -> Error {
    Error::Type {
        operator,
        ranks: vec![a.rank(), b.rank()],
    }
}

pub fn type_error1(operator: &'static str, a: &Value) -> Error {
    Error::Type {
        operator,
        ranks: vec![a.rank()],
    }
}

pub fn is_num(v: &Value) -> bool {
    v.rank().is_num()
}

pub fn is_seq(v: &Value) -> bool {
    v.rank().is_seq()
}

pub fn is_func(v: &Value) -> bool {
    v.rank().is_func()
}

/// The three-way result type grouping used by `*`'s join sub-table: a
/// Seq's "concrete kind" once commonized (List / Str / Regex).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    List,
    Str,
    Regex,
}

pub fn seq_kind(v: &Value) -> Option<SeqKind> {
    match v.rank() {
        Rank::List => Some(SeqKind::List),
        Rank::Str => Some(SeqKind::Str),
        Rank::Regex => Some(SeqKind::Regex),
        _ => None,
    }
}

/// Split a List/Str/Regex into its elements, each as a `Value` at the
/// appropriate rank (Int codepoints for Str/Regex, direct elements for
/// List). Used by the several operators that treat all three Seq kinds
/// uniformly over "elements".
pub fn seq_elements(v: &Value) -> Result<Vec<Value>> {
    match v {
        Value::List(items) => Ok(items.iter().cloned().collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
        Value::Regex(r) => Ok(r.pattern.chars().map(|c| Value::str(c.to_string())).collect()),
        other => Err(type_error1("seq_elements", other)),
    }
}

/// Concatenate two Func values' token sequences: `+` on (Func, Func) is
/// composition; `&|^` on (Func, Func) reuse the same concatenation as
/// their "run both on shared inputs" synthesis, a judgment call where the
/// source text is vague about the exact shape.
pub fn compose(a: &Value, b: &Value) -> Result<Value> {
    use crate::value::{convert, BlockValue};
    use std::rc::Rc;
    let ab = convert(a, Rank::Block)?;
    let bb = convert(b, Rank::Block)?;
    if let (Value::Block(x), Value::Block(y)) = (ab, bb) {
        let mut tokens = x.tokens.as_ref().clone();
        tokens.extend(y.tokens.iter().cloned());
        Ok(Value::Block(Rc::new(BlockValue {
            tokens: Rc::new(tokens),
            captured_scope: x.captured_scope.clone(),
            scoped: x.scoped,
        })))
    } else {
        unreachable!("convert(_, Rank::Block) always yields Value::Block")
    }
}

/// Rebuild a Seq of the same kind as `like` from a vector of element
/// values produced by `seq_elements` (after a filter/map/etc).
pub fn seq_from_elements(like: &Value, elements: Vec<Value>) -> Result<Value> {
    match seq_kind(like) {
        Some(SeqKind::List) => Ok(Value::list(elements)),
        Some(SeqKind::Str) => {
            let mut s = String::new();
            for e in elements {
                s.push_str(&crate::value::convert(&e, Rank::Str)?.to_string());
            }
            Ok(Value::str(s))
        }
        Some(SeqKind::Regex) => {
            let mut pattern = String::new();
            for e in elements {
                pattern.push_str(&crate::value::convert(&e, Rank::Str)?.to_string());
            }
            Ok(Value::Regex(std::rc::Rc::new(crate::value::RegexValue::new(
                pattern,
                crate::value::RegexFlags::empty(),
            )?)))
        }
        None => Err(type_error1("seq_from_elements", like)),
    }
}
