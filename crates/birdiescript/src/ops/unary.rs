//! `_ ~ # ( )`: the five unary overloads, each dispatching on a
//! single operand's group (Num / Seq / Func).
//!
//! A few of the Func-group behaviors ("prepend-swap", "commute",
//! "mutate-function") are described only by a one-word gloss in the source
//! text with no further elaboration. The concrete choices made here are
//! judgment calls, recorded in DESIGN.md: `~`/`#` on a Func prepend a
//! `$` (swap) call to its token sequence; `(`/`)` on a Func toggle its
//! `scoped` flag off/on.

use num_bigint::BigInt;
use num_traits::Signed;

use super::{invoke, seq_elements, seq_from_elements};
use crate::context::{Context, Machine};
use crate::error::{Error, Result};
use crate::scope::Scope;
use crate::token::{Role, Token, TokenKind};
use crate::value::{BlockValue, Value};

/// View any Func-group value as a Block: a Builtin is represented as a
/// one-token Block that calls it by its canonical name, so the
/// prepend-swap/un-scope transforms below apply to it the same way `_`
/// already invokes Block and Builtin uniformly.
fn as_block(v: &Value) -> std::rc::Rc<BlockValue> {
    match v {
        Value::Block(b) => b.clone(),
        Value::Builtin(def) => std::rc::Rc::new(BlockValue {
            tokens: std::rc::Rc::new(vec![Token {
                kind: TokenKind::Name {
                    role: Role::Call,
                    tier: None,
                    text: def.names[0].to_string(),
                },
                raw: def.names[0].to_string(),
                offset: 0,
            }]),
            captured_scope: Scope::new_root(),
            scoped: true,
        }),
        other => unreachable!("as_block called on a non-Func value: {other:?}"),
    }
}

fn prepend_swap(block: &std::rc::Rc<BlockValue>) -> Value {
    let swap_token = Token {
        kind: TokenKind::Name {
            role: Role::Call,
            tier: None,
            text: "$".to_string(),
        },
        raw: "$".to_string(),
        offset: 0,
    };
    let mut tokens = vec![swap_token];
    tokens.extend(block.tokens.iter().cloned());
    Value::Block(std::rc::Rc::new(BlockValue {
        tokens: std::rc::Rc::new(tokens),
        captured_scope: block.captured_scope.clone(),
        scoped: block.scoped,
    }))
}

fn toggle_scoped(block: &std::rc::Rc<BlockValue>, scoped: bool) -> Value {
    Value::Block(std::rc::Rc::new(BlockValue {
        tokens: std::rc::Rc::clone(&block.tokens),
        captured_scope: block.captured_scope.clone(),
        scoped,
    }))
}

/// `_`: negate / dump-sequence / execute.
pub fn neg_or_dump(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    match &v {
        Value::Int(n) => machine.push(Value::Int(-n)),
        Value::Float(f) => machine.push(Value::Float(-f)),
        Value::Complex(re, im) => machine.push(Value::Complex(-re, -im)),
        Value::List(_) | Value::Str(_) | Value::Regex(_) => {
            for elem in seq_elements(&v)? {
                machine.push(elem);
            }
        }
        Value::Block(_) | Value::Builtin(_) => invoke(machine, ctx, &v)?,
    }
    Ok(())
}

/// `~`: bitwise-negate (Int) / conjugate (Complex, Float is its own
/// conjugate) / reverse (Seq) / prepend-swap (Func).
pub fn flip(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    let out = match &v {
        Value::Int(n) => Value::Int(-(n + BigInt::from(1))),
        Value::Float(f) => Value::Float(*f),
        Value::Complex(re, im) => Value::Complex(*re, -im),
        Value::List(items) => Value::list(items.iter().cloned().rev().collect()),
        Value::Str(s) => Value::str(s.chars().rev().collect::<String>()),
        Value::Regex(r) => Value::Regex(std::rc::Rc::new(
            crate::value::RegexValue::new(r.pattern.chars().rev().collect::<String>(), r.flags)?,
        )),
        Value::Block(_) | Value::Builtin(_) => prepend_swap(&as_block(&v)),
    };
    machine.push(out);
    Ok(())
}

/// `#`: absolute value (Num) / length (Seq) / commute (Func, same mechanism
/// as `~`'s prepend-swap).
pub fn abs_or_len(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    let out = match &v {
        Value::Int(n) => Value::Int(n.abs()),
        Value::Float(f) => Value::Float(f.abs()),
        Value::Complex(re, im) => Value::Float((re * re + im * im).sqrt()),
        Value::List(items) => Value::int(items.len() as i64),
        Value::Str(s) => Value::int(s.chars().count() as i64),
        Value::Regex(r) => Value::int(r.pattern.chars().count() as i64),
        Value::Block(_) | Value::Builtin(_) => prepend_swap(&as_block(&v)),
    };
    machine.push(out);
    Ok(())
}

/// `(`: decrement (Num) / uncons-front (Seq) / un-scope (Func).
pub fn open_paren(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    match &v {
        Value::Int(n) => machine.push(Value::Int(n - BigInt::from(1))),
        Value::Float(f) => machine.push(Value::Float(f - 1.0)),
        Value::Complex(re, im) => machine.push(Value::Complex(re - 1.0, *im)),
        Value::List(_) | Value::Str(_) | Value::Regex(_) => uncons_front(machine, &v)?,
        Value::Block(_) | Value::Builtin(_) => machine.push(toggle_scoped(&as_block(&v), false)),
    }
    Ok(())
}

/// `)`: increment (Num) / uncons-back (Seq) / re-scope (Func).
pub fn close_paren(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    match &v {
        Value::Int(n) => machine.push(Value::Int(n + BigInt::from(1))),
        Value::Float(f) => machine.push(Value::Float(f + 1.0)),
        Value::Complex(re, im) => machine.push(Value::Complex(re + 1.0, *im)),
        Value::List(_) | Value::Str(_) | Value::Regex(_) => uncons_back(machine, &v)?,
        Value::Block(_) | Value::Builtin(_) => machine.push(toggle_scoped(&as_block(&v), true)),
    }
    Ok(())
}

/// Pop the first element off a Seq, pushing the remainder then the
/// element: net stack effect `seq -- remainder elem`.
fn uncons_front(machine: &mut Machine, v: &Value) -> Result<()> {
    let mut elements = seq_elements(v)?;
    if elements.is_empty() {
        return Err(Error::Value {
            message: "first of an empty sequence".to_string(),
        });
    }
    let head = elements.remove(0);
    machine.push(seq_from_elements(v, elements)?);
    machine.push(head);
    Ok(())
}

/// Pop the last element off a Seq, pushing the remainder then the
/// element: net stack effect `seq -- remainder elem`.
fn uncons_back(machine: &mut Machine, v: &Value) -> Result<()> {
    let mut elements = seq_elements(v)?;
    let Some(tail) = elements.pop() else {
        return Err(Error::Value {
            message: "last of an empty sequence".to_string(),
        });
    };
    machine.push(seq_from_elements(v, elements)?);
    machine.push(tail);
    Ok(())
}
