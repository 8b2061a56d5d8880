//! `< >`: total ordering within Num or Seq, plus the
//! take/drop-n and takewhile/dropwhile Func fallbacks.

use std::cmp::Ordering;

use super::{invoke, is_func, is_num, is_seq, pop_pair, seq_elements, seq_from_elements, type_error};
use crate::context::{Context, Machine};
use crate::error::Result;
use crate::value::{compare, Rank, Value};

fn to_usize(v: &Value) -> Result<usize> {
    match v {
        Value::Int(n) => Ok(num_traits::ToPrimitive::to_isize(n).unwrap_or(0).max(0) as usize),
        Value::Float(f) => Ok((*f as isize).max(0) as usize),
        _ => Err(type_error("<", v, v)),
    }
}

pub fn lt(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (a, b) = pop_pair(machine);
    ordered(machine, ctx, a, b, "<", Ordering::Less, true)
}

pub fn gt(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let (a, b) = pop_pair(machine);
    ordered(machine, ctx, a, b, ">", Ordering::Greater, false)
}

/// Shared body for `<`/`>`: Num/Num or Seq/Seq compares directly; Seq/Num
/// takes or drops the first `n`; Func/Seq takes or drops while the
/// predicate holds.
fn ordered(
    machine: &mut Machine,
    ctx: &mut Context,
    a: Value,
    b: Value,
    op: &'static str,
    less: Ordering,
    take_is_take: bool,
) -> Result<()> {
    let (mut a, mut b) = (a, b);
    if (is_num(&a) && !is_num(&b)) || (is_seq(&a) && is_func(&b)) {
        std::mem::swap(&mut a, &mut b);
    }
    if (is_num(&a) && is_num(&b)) || (is_seq(&a) && is_seq(&b)) {
        let ord = compare(&a, &b)?;
        machine.push(Value::int(i64::from(ord == less)));
        return Ok(());
    }
    if is_seq(&a) && matches!(b.rank(), Rank::Int | Rank::Float) {
        let n = to_usize(&b)?;
        let elements = seq_elements(&a)?;
        let n = n.min(elements.len());
        let (head, tail) = elements.split_at(n);
        let slice = if take_is_take { head } else { tail };
        machine.push(seq_from_elements(&a, slice.to_vec())?);
        return Ok(());
    }
    if is_func(&a) && is_seq(&b) {
        let mut taken = Vec::new();
        let elements = seq_elements(&b)?;
        let mut split_at = elements.len();
        for (i, elem) in elements.iter().enumerate() {
            machine.push(elem.clone());
            invoke(machine, ctx, &a)?;
            if !machine.pop().truthy() {
                split_at = i;
                break;
            }
            taken.push(elem.clone());
        }
        let result = if take_is_take {
            taken
        } else {
            elements[split_at..].to_vec()
        };
        machine.push(seq_from_elements(&b, result)?);
        return Ok(());
    }
    Err(type_error(op, &a, &b))
}
