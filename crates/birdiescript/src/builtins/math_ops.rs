//! A small math sample beyond the unary operator table, grounded on
//! `original_source/birdiescript/builtins.py`'s trigonometric and `Sqrt`
//! entries — enough to demonstrate the registration pattern for the
//! excluded bulk math catalogue without porting all of it.

use num_traits::ToPrimitive;

use crate::context::{Context, Machine};
use crate::error::{Error, Result};
use crate::value::{convert, BuiltinDef, Rank, Value};

fn as_f64(v: &Value) -> Result<f64> {
    match convert(v, Rank::Float)? {
        Value::Float(f) => Ok(f),
        _ => unreachable!("convert(_, Rank::Float) always yields Value::Float"),
    }
}

fn sin(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    machine.push(Value::Float(as_f64(&v)?.sin()));
    Ok(())
}

fn cos(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    machine.push(Value::Float(as_f64(&v)?.cos()));
    Ok(())
}

/// `Q` Sqrt: a Complex result for a negative real input, matching the
/// source's `cmath.sqrt` fallback, and a plain Float otherwise.
fn sqrt(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    let f = as_f64(&v)?;
    if f < 0.0 {
        machine.push(Value::Complex(0.0, (-f).sqrt()));
    } else {
        machine.push(Value::Float(f.sqrt()));
    }
    Ok(())
}

/// `Abs`: a named alias for the `#` unary operator's Num-group behavior,
/// registered separately so a script can call it by name without relying
/// on the symbol (the original keeps both forms too).
fn abs(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    crate::ops::unary::abs_or_len(machine, ctx)
}

/// `U` Upto: `n U` pushes the List `[0 1 ... n-1]`, as used directly by a
/// core testable scenario (`10 U` → `[0 1 ... 9]`), so it is registered
/// here alongside the rest of the math sample even though it is itself a
/// sequence-producing builtin.
fn upto(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let v = machine.pop();
    let n = match convert(&v, Rank::Int)? {
        Value::Int(n) => n.to_usize().ok_or_else(|| Error::Value {
            message: "Upto count out of range".to_string(),
        })?,
        _ => unreachable!("convert(_, Rank::Int) always yields Value::Int"),
    };
    machine.push(Value::list((0..n).map(Value::int).collect()));
    Ok(())
}

pub static ENTRIES: &[BuiltinDef] = &[
    BuiltinDef {
        names: &["S", "Sin", "Sine"],
        handler: sin,
        doc: "Sine of a number, in radians.",
    },
    BuiltinDef {
        names: &["C", "Cos", "Cosine"],
        handler: cos,
        doc: "Cosine of a number, in radians.",
    },
    BuiltinDef {
        names: &["Q", "Sqrt"],
        handler: sqrt,
        doc: "Square root; Complex for a negative real input.",
    },
    BuiltinDef {
        names: &["Abs", "Absolute"],
        handler: abs,
        doc: "Absolute value or sequence length (same as the `#` unary operator).",
    },
    BuiltinDef {
        names: &["U", "Up", "Upto"],
        handler: upto,
        doc: "`n U` pushes the List [0 1 ... n-1].",
    },
];
