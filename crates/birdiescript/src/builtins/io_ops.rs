//! A representative sample of the I/O capability catalogue, grounded on
//! `original_source/birdiescript/builtins.py`'s `#### Input functions
//! ####`/`#### Output functions ####` sections. Routed through
//! `Machine::capabilities.io` rather than touching stdio directly, so a
//! sandboxed embedding (`NullCapabilities`) can deny every one of them
//! uniformly.

use crate::context::{Context, Machine};
use crate::error::Result;
use crate::value::{convert, BuiltinDef, Rank, Value};

/// `>n` Readline: read up to a newline; an empty Str at EOF, matching the
/// original's `sys.stdin.readline()` behavior.
fn readline(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let line = machine.capabilities.io.read_line()?.unwrap_or_default();
    machine.push(Value::str(line));
    Ok(())
}

/// `>c` Readchar: read one character; `Int(-1)` at EOF rather than the
/// original's silent empty-string-then-index-panic path — the original's
/// `BStr('').simplify().value[0]` would raise an IndexError on EOF in the
/// source language; this crate gives EOF an explicit, documented sentinel
/// value instead.
fn readchar(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    match machine.capabilities.io.read_char()? {
        Some(c) => machine.push(Value::str(c.to_string())),
        None => machine.push(Value::int(-1)),
    }
    Ok(())
}

/// `O` Out: print the top of the stack without popping it.
fn out(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let top = machine.peek(-1);
    let text = convert(&top, Rank::Str)?;
    if let Value::Str(s) = text {
        machine.capabilities.io.write_str(&s)?;
    }
    Ok(())
}

/// `P` Print: pop and print a value.
fn print(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    out(machine, ctx)?;
    machine.pop();
    Ok(())
}

/// `Pn` Println: pop and print a value followed by a newline.
fn println(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    print(machine, ctx)?;
    machine.capabilities.io.write_str("\n")?;
    Ok(())
}

pub static ENTRIES: &[BuiltinDef] = &[
    BuiltinDef {
        names: &[">n", "Readline"],
        handler: readline,
        doc: "Read up to a newline from standard input.",
    },
    BuiltinDef {
        names: &[">c", "Readchar"],
        handler: readchar,
        doc: "Read a single character from standard input.",
    },
    BuiltinDef {
        names: &["O", "Out"],
        handler: out,
        doc: "Print the top of the stack without popping it.",
    },
    BuiltinDef {
        names: &["P", "Print"],
        handler: print,
        doc: "Pop and print a value.",
    },
    BuiltinDef {
        names: &["Pn", "Println"],
        handler: println,
        doc: "Pop and print a value followed by a newline.",
    },
];
