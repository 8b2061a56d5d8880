//! `& | ^`: Int bitwise ops, Seq set ops, and the Func-over-Seq
//! filter/map/filter-indices shapes they fall back to.

use num_bigint::BigInt;

use super::{commonize, invoke, is_func, is_num, is_seq, pop_pair, seq_elements, seq_from_elements, type_error};
use crate::context::{Context, Machine};
use crate::error::Result;
use crate::value::Value;

fn int_pair(a: Value, b: Value, op: &'static str) -> Result<(BigInt, BigInt)> {
    let (a, b) = commonize(a, b)?;
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok((x, y)),
        (a, b) => Err(type_error(op, &a, &b)),
    }
}

/// Order-preserving de-duplicated union/intersection/symmetric-difference
/// over two Seqs, preserving left-first order and removing duplicates.
/// `keep(in_other)` is evaluated once per element of each side, `in_other`
/// meaning "also present in the opposite sequence" — symmetric by
/// construction, which is what intersection/union/symmetric-difference all
/// are.
fn set_op(a: &Value, b: &Value, keep: impl Fn(bool) -> bool) -> Result<Value> {
    let left = seq_elements(a)?;
    let right = seq_elements(b)?;
    let mut out = Vec::new();
    let mut seen: Vec<&Value> = Vec::new();
    for elem in left.iter() {
        let in_right = right.iter().any(|r| r == elem);
        if keep(in_right) && !seen.iter().any(|s| *s == elem) {
            out.push(elem.clone());
            seen.push(elem);
        }
    }
    for elem in right.iter() {
        let in_left = left.iter().any(|l| l == elem);
        if keep(in_left) && !seen.iter().any(|s| *s == elem) {
            out.push(elem.clone());
            seen.push(elem);
        }
    }
    seq_from_elements(a, out)
}

pub fn and(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (mut a, mut b) = pop_pair(machine);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_num(&a) && is_num(&b) {
        let (x, y) = int_pair(a, b, "&")?;
        machine.push(Value::Int(x & y));
        return Ok(());
    }
    if is_seq(&a) && is_seq(&b) {
        let result = set_op(&a, &b, |in_other| in_other)?;
        machine.push(result);
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        filter(machine, ctx, &a, &b)?;
        return Ok(());
    }
    if is_func(&a) && is_func(&b) {
        machine.push(super::compose(&a, &b)?);
        return Ok(());
    }
    Err(type_error("&", &a, &b))
}

pub fn or(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (mut a, mut b) = pop_pair(machine);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_num(&a) && is_num(&b) {
        let (x, y) = int_pair(a, b, "|")?;
        machine.push(Value::Int(x | y));
        return Ok(());
    }
    if is_seq(&a) && is_seq(&b) {
        let result = set_op(&a, &b, |_in_other| true)?;
        machine.push(result);
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        let mut mapped = Vec::new();
        for elem in seq_elements(&b)? {
            machine.push(elem);
            invoke(machine, ctx, &a)?;
            mapped.push(machine.pop());
        }
        machine.push(Value::list(mapped));
        return Ok(());
    }
    if is_func(&a) && is_func(&b) {
        machine.push(super::compose(&a, &b)?);
        return Ok(());
    }
    Err(type_error("|", &a, &b))
}

pub fn xor(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (mut a, mut b) = pop_pair(machine);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if is_num(&a) && is_num(&b) {
        let (x, y) = int_pair(a, b, "^")?;
        machine.push(Value::Int(x ^ y));
        return Ok(());
    }
    if is_seq(&a) && is_seq(&b) {
        let result = set_op(&a, &b, |in_other| !in_other)?;
        machine.push(result);
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        let mut indices = Vec::new();
        for (i, elem) in seq_elements(&b)?.into_iter().enumerate() {
            machine.push(elem);
            invoke(machine, ctx, &a)?;
            if machine.pop().truthy() {
                indices.push(Value::int(i as i64));
            }
        }
        machine.push(Value::list(indices));
        return Ok(());
    }
    if is_func(&a) && is_func(&b) {
        machine.push(super::compose(&a, &b)?);
        return Ok(());
    }
    Err(type_error("^", &a, &b))
}

fn filter(machine: &mut Machine, ctx: &mut Context, f: &Value, seq: &Value) -> Result<()> {
    let mut kept = Vec::new();
    for elem in seq_elements(seq)? {
        machine.push(elem.clone());
        invoke(machine, ctx, f)?;
        if machine.pop().truthy() {
            kept.push(elem);
        }
    }
    machine.push(seq_from_elements(seq, kept)?);
    Ok(())
}
