//! Stack shuffling: `,` `;` `$` `@` `?` the list-mark pair `[`/`]`, and
//! `Pick`/`Depth`, grounded on `original_source/birdiescript/builtins.py`'s
//! `#### Stack operations ####` section.

use crate::context::{Context, Machine};
use crate::error::Result;
use crate::value::{BuiltinDef, Value};

/// `,` Dup: `( a -- a a )`.
fn dup(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let a = machine.peek(-1);
    machine.push(a);
    Ok(())
}

/// `;` Pop: `( a -- )`.
fn pop(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    machine.pop();
    Ok(())
}

/// `?` Over: `( a b -- a b a )`.
fn over(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let a = machine.peek(-2);
    machine.push(a);
    Ok(())
}

/// `$` Swap: `( a b -- b a )`.
fn swap(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let b = machine.pop();
    let a = machine.pop();
    machine.push(b);
    machine.push(a);
    Ok(())
}

/// `@` Rot: `( a b c -- b c a )`.
fn rot(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let c = machine.pop();
    let b = machine.pop();
    let a = machine.pop();
    machine.push(b);
    machine.push(c);
    machine.push(a);
    Ok(())
}

/// `#t` Depth: number of items on the stack.
fn depth(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    machine.push(Value::int(machine.stack.len() as i64));
    Ok(())
}

/// `;s` Clr/Clear: empty the stack.
fn clear(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    machine.stack.clear();
    machine.list_marks.clear();
    Ok(())
}

/// `,k` Pick: copy the item at a (possibly negative) index to the top,
/// using `Machine::peek`'s own indexing convention (0 is the bottom of the
/// stack, -1 is the top) rather than the original's bitwise-NOT scheme.
fn pick(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let k = machine.pop();
    let idx = match k {
        Value::Int(n) => num_traits::ToPrimitive::to_isize(&n).unwrap_or(0),
        other => return Err(crate::error::Error::Type {
            operator: ",k",
            ranks: vec![other.rank()],
        }),
    };
    let value = machine.peek(idx);
    machine.push(value);
    Ok(())
}

/// `[`: push the current stack length as a new list mark.
fn list_start(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    machine.mark_list_start();
    Ok(())
}

/// `]`: pop the top list mark and collect everything above it into a List.
fn list_end(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let list = machine.close_list();
    machine.push(list);
    Ok(())
}

pub static ENTRIES: &[BuiltinDef] = &[
    BuiltinDef {
        names: &[",", "Dup"],
        handler: dup,
        doc: "Duplicate the top of the stack.",
    },
    BuiltinDef {
        names: &[";", "Pop"],
        handler: pop,
        doc: "Discard the top of the stack.",
    },
    BuiltinDef {
        names: &["?", "Over"],
        handler: over,
        doc: "Copy the second-from-top item to the top.",
    },
    BuiltinDef {
        names: &["$", "Swap"],
        handler: swap,
        doc: "Swap the top two items.",
    },
    BuiltinDef {
        names: &["@", "Rot"],
        handler: rot,
        doc: "Rotate the top three items, bringing the third to the top.",
    },
    BuiltinDef {
        names: &["#t", "Depth"],
        handler: depth,
        doc: "Push the number of items on the stack.",
    },
    BuiltinDef {
        names: &[";s", "Clr", "Clear"],
        handler: clear,
        doc: "Empty the stack.",
    },
    BuiltinDef {
        names: &[",k", "Pick"],
        handler: pick,
        doc: "Copy the item at a given index to the top of the stack.",
    },
    BuiltinDef {
        names: &["[", "Listmark"],
        handler: list_start,
        doc: "Push a new list mark recording the current stack depth.",
    },
    BuiltinDef {
        names: &["]", "Listend"],
        handler: list_end,
        doc: "Collect everything above the top list mark into a List.",
    },
];
