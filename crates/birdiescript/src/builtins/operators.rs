//! Wires the `ops::{arith,bitwise,compare,unary}` dispatch functions into
//! the builtins table under their operator-symbol names. The handlers
//! themselves live in `ops::*`; this module is purely registration,
//! keeping an operator's implementation separate from its builtin-table
//! entry.

use crate::ops::{arith, bitwise, compare, unary};
use crate::value::BuiltinDef;

pub static ENTRIES: &[BuiltinDef] = &[
    BuiltinDef {
        names: &["+", "Add", "Plus"],
        handler: arith::add,
        doc: "Add, concatenate, or compose, depending on operand types.",
    },
    BuiltinDef {
        names: &["-", "Sub", "Minus"],
        handler: arith::sub,
        doc: "Subtract, difference, or map-no-collect, depending on operand types.",
    },
    BuiltinDef {
        names: &["*", "Mul", "Times"],
        handler: arith::mul,
        doc: "Multiply, repeat, join, or fold, depending on operand types.",
    },
    BuiltinDef {
        names: &["/", "Div"],
        handler: arith::div,
        doc: "Divide, chunk, split, or partition, depending on operand types.",
    },
    BuiltinDef {
        names: &["%", "Mod", "Modulo"],
        handler: arith::modulo,
        doc: "Modulo, stride, split-no-empty, or scan, depending on operand types.",
    },
    BuiltinDef {
        names: &["&", "And"],
        handler: bitwise::and,
        doc: "Bitwise AND, set intersection, or filter, depending on operand types.",
    },
    BuiltinDef {
        names: &["|", "Or"],
        handler: bitwise::or,
        doc: "Bitwise OR, set union, or map, depending on operand types.",
    },
    BuiltinDef {
        names: &["^", "Xor"],
        handler: bitwise::xor,
        doc: "Bitwise XOR, symmetric difference, or filter-indices, depending on operand types.",
    },
    BuiltinDef {
        names: &["<", "Lt"],
        handler: compare::lt,
        doc: "Less-than, or take/takewhile, depending on operand types.",
    },
    BuiltinDef {
        names: &[">", "Gt"],
        handler: compare::gt,
        doc: "Greater-than, or drop/dropwhile, depending on operand types.",
    },
    BuiltinDef {
        names: &["_"],
        handler: unary::neg_or_dump,
        doc: "Negate a number, dump a sequence's elements, or invoke a Func.",
    },
    BuiltinDef {
        names: &["~"],
        handler: unary::flip,
        doc: "Bitwise-not, conjugate, reverse, or prepend-swap, depending on operand type.",
    },
    BuiltinDef {
        names: &["#"],
        handler: unary::abs_or_len,
        doc: "Absolute value, length, or prepend-swap, depending on operand type.",
    },
    BuiltinDef {
        names: &["("],
        handler: unary::open_paren,
        doc: "Decrement, first element, or un-scope a Func.",
    },
    BuiltinDef {
        names: &[")"],
        handler: unary::close_paren,
        doc: "Increment, last element, or re-scope a Func.",
    },
];
