//! Registers `ops::control`'s `I D Du W Wt Bk Br Ex Rt Ll Go` under their
//! exact names.

use crate::ops::control;
use crate::value::BuiltinDef;

pub static ENTRIES: &[BuiltinDef] = &[
    BuiltinDef {
        names: &["I", "If"],
        handler: control::if_then_else,
        doc: "Pop a condition, a then-block, and an else-block; invoke one.",
    },
    BuiltinDef {
        names: &["W", "While"],
        handler: control::while_loop,
        doc: "Pop a condition block and a body block; loop while the condition holds.",
    },
    BuiltinDef {
        names: &["D", "Do"],
        handler: control::do_while,
        doc: "Pop a condition block and a body block; run the body once, then loop while the condition holds.",
    },
    BuiltinDef {
        names: &["Du", "Dountil"],
        handler: control::do_until,
        doc: "Pop a condition block and a body block; run the body once, then loop until the condition holds.",
    },
    BuiltinDef {
        names: &["Wt", "Whiletrue"],
        handler: control::while_true,
        doc: "Pop a single body block and repeat it until a break, return, or exit fires.",
    },
    BuiltinDef {
        names: &["Bk", "Break"],
        handler: control::break_n_op,
        doc: "Break out of a given number of enclosing loops.",
    },
    BuiltinDef {
        names: &["Br"],
        handler: control::break_one,
        doc: "Break out of the immediately enclosing loop (equivalent to `1 Bk`).",
    },
    BuiltinDef {
        names: &["Ex", "Exit"],
        handler: control::exit,
        doc: "Unwind unconditionally to the top of the script.",
    },
    BuiltinDef {
        names: &["Rt", "Return"],
        handler: control::ret,
        doc: "Return from the nearest enclosing function call.",
    },
    BuiltinDef {
        names: &["Ll", "Label"],
        handler: control::label,
        doc: "Push the root instruction cursor's current position.",
    },
    BuiltinDef {
        names: &["Go", "Goto"],
        handler: control::goto,
        doc: "Set the root instruction cursor to a previously labeled position.",
    },
];
