//! `I D Du W Wt Bk Br Ex Rt Ll Go`: conditionals, loops, and the
//! break/return/exit/goto family built on `context::{break_n, return_from,
//! exit_all, absorb_break}`.

use super::invoke;
use crate::context::{absorb_break, apply_value, break_n, exit_all, return_from, Broken, Context, Machine};
use crate::error::{Error, Result};
use crate::value::Value;

/// `I`: pop else-block, then-block, condition; invoke one.
pub fn if_then_else(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let else_branch = machine.pop();
    let then_branch = machine.pop();
    let cond = machine.pop();
    if cond.truthy() {
        invoke(machine, ctx, &then_branch)
    } else {
        invoke(machine, ctx, &else_branch)
    }
}

/// `W`: pop body, cond; invoke cond; while the popped result is truthy and
/// the Context hasn't broken, invoke body then cond again.
pub fn while_loop(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let body = machine.pop();
    let cond = machine.pop();
    loop {
        invoke_looping(machine, ctx, &cond)?;
        if ctx.broken != Broken::Idle {
            break;
        }
        let keep_going = machine.pop().truthy();
        if !keep_going {
            break;
        }
        invoke_looping(machine, ctx, &body)?;
        if ctx.broken != Broken::Idle {
            break;
        }
    }
    absorb_break(ctx);
    Ok(())
}

/// `D`: do-while. Runs body once unconditionally, then loops while cond
/// holds.
pub fn do_while(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let body = machine.pop();
    let cond = machine.pop();
    loop {
        invoke_looping(machine, ctx, &body)?;
        if ctx.broken != Broken::Idle {
            break;
        }
        invoke_looping(machine, ctx, &cond)?;
        if ctx.broken != Broken::Idle {
            break;
        }
        if !machine.pop().truthy() {
            break;
        }
    }
    absorb_break(ctx);
    Ok(())
}

/// `Du`: do-until — identical to `D` but stops when the condition becomes
/// truthy instead of falsy.
pub fn do_until(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let body = machine.pop();
    let cond = machine.pop();
    loop {
        invoke_looping(machine, ctx, &body)?;
        if ctx.broken != Broken::Idle {
            break;
        }
        invoke_looping(machine, ctx, &cond)?;
        if ctx.broken != Broken::Idle {
            break;
        }
        if machine.pop().truthy() {
            break;
        }
    }
    absorb_break(ctx);
    Ok(())
}

/// `Wt`: "while-true" shorthand — pops a single block and repeats it until
/// a break/return/exit fires (no separate condition block; the loop body
/// itself decides via `Bk`/`Br`/`Ex`).
pub fn while_true(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let body = machine.pop();
    loop {
        invoke_looping(machine, ctx, &body)?;
        if ctx.broken != Broken::Idle {
            break;
        }
    }
    absorb_break(ctx);
    Ok(())
}

/// Invoke a loop-body value with the `looping` flag threaded through to
/// `call_block`'s wrapper Context (see `context::call_block`), so a
/// `Bk`/`Br` unwinding through it counts it toward its break budget. Only
/// a Block invocation actually plants a wrapper; a Builtin or plain value
/// ignores the flag, which matches the original semantics (a loop body
/// that isn't itself a Block can't be broken out of mid-iteration anyway).
fn invoke_looping(machine: &mut Machine, ctx: &mut Context, f: &Value) -> Result<()> {
    apply_value(machine, ctx, f, true)
}

/// `Bk n`: break out of `n` enclosing loops.
pub fn break_n_op(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let n = machine.pop();
    let n = match n {
        Value::Int(i) => num_traits::ToPrimitive::to_u32(&i).unwrap_or(0),
        _ => return Err(Error::Value {
            message: "Bk expects an integer break count".to_string(),
        }),
    };
    break_n(ctx, n.max(1));
    Ok(())
}

/// `Br` ≡ `1 Bk`.
pub fn break_one(_machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    break_n(ctx, 1);
    Ok(())
}

/// `Ex`: unconditional unwind to the top.
pub fn exit(_machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    exit_all(ctx);
    Ok(())
}

/// `Rt`: function return.
pub fn ret(_machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    return_from(ctx);
    Ok(())
}

fn root_mut(ctx: &mut Context) -> &mut Context {
    let mut cur = ctx;
    loop {
        if cur.parent.is_some() {
            cur = cur.parent.as_deref_mut().expect("checked Some");
        } else {
            return cur;
        }
    }
}

/// `Ll`: push the root Context's current cursor (1-based).
pub fn label(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let root = root_mut(ctx);
    machine.push(Value::int((root.cursor + 1) as i64));
    Ok(())
}

/// `Go`: pop a 1-based position and set the root Context's cursor so the
/// dispatch loop resumes there (the loop increments the cursor after
/// `step`, so the target is stored one short).
pub fn goto(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let target = machine.pop();
    let target = match target {
        Value::Int(i) => num_traits::ToPrimitive::to_usize(&i).unwrap_or(1),
        _ => {
            return Err(Error::Value {
                message: "Go expects a 1-based instruction position".to_string(),
            })
        }
    };
    let root = root_mut(ctx);
    root.cursor = target.saturating_sub(1).saturating_sub(1);
    Ok(())
}
