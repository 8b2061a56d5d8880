//! One builtin per target rank, each just `convert(top, target)` (spec
//! §4.3's conversion table). Named after the rank, matching
//! `original_source/birdiescript/core.py`'s per-type conversion builtins
//! (`Ai`, `Af`, `Ay`, `As`, `Ar`, `Ab` in the original's naming; this crate
//! uses the plain Rank names instead since those single-letter codes carry
//! no meaning outside the original's own mnemonic scheme).

use crate::context::{Context, Machine};
use crate::error::Result;
use crate::value::{convert, BuiltinDef, Rank};

fn convert_to(rank: Rank) -> impl Fn(&mut Machine, &mut Context) -> Result<()> {
    move |machine, _ctx| {
        let v = machine.pop();
        machine.push(convert(&v, rank)?);
        Ok(())
    }
}

macro_rules! conversion_builtin {
    ($fn_name:ident, $rank:expr) => {
        fn $fn_name(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
            convert_to($rank)(machine, ctx)
        }
    };
}

conversion_builtin!(to_int, Rank::Int);
conversion_builtin!(to_float, Rank::Float);
conversion_builtin!(to_complex, Rank::Complex);
conversion_builtin!(to_list, Rank::List);
conversion_builtin!(to_str, Rank::Str);
conversion_builtin!(to_regex, Rank::Regex);
conversion_builtin!(to_block, Rank::Block);

pub static ENTRIES: &[BuiltinDef] = &[
    BuiltinDef {
        names: &["Int"],
        handler: to_int,
        doc: "Convert the top of the stack to an Int.",
    },
    BuiltinDef {
        names: &["Float"],
        handler: to_float,
        doc: "Convert the top of the stack to a Float.",
    },
    BuiltinDef {
        names: &["Complex"],
        handler: to_complex,
        doc: "Convert the top of the stack to a Complex.",
    },
    BuiltinDef {
        names: &["List"],
        handler: to_list,
        doc: "Convert the top of the stack to a List.",
    },
    BuiltinDef {
        names: &["Str"],
        handler: to_str,
        doc: "Convert the top of the stack to a Str.",
    },
    BuiltinDef {
        names: &["Regex"],
        handler: to_regex,
        doc: "Convert the top of the stack to a Regex.",
    },
    BuiltinDef {
        names: &["Block"],
        handler: to_block,
        doc: "Convert the top of the stack to a Block.",
    },
];
