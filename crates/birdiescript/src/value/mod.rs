//! The value lattice: eight ranked variants, coercion, conversion,
//! simplification, and textual form.

pub(crate) mod convert;
mod format;
mod ord_eq;
mod regex_value;

pub use convert::{coerce, convert};
pub use format::nice_float;
pub use ord_eq::{compare, strict_eq};
pub use regex_value::RegexFlags;
pub use regex_value::RegexValue;

use std::rc::Rc;

use num_bigint::BigInt;

use crate::context::{Context, Machine};
use crate::error::Result;
use crate::scope::Scope;
use crate::token::Token;

/// The total order over value kinds that drives `coerce`/`convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Int = 0,
    Float = 1,
    Complex = 2,
    List = 3,
    Str = 4,
    Regex = 5,
    Block = 6,
    Builtin = 7,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::Int,
        Rank::Float,
        Rank::Complex,
        Rank::List,
        Rank::Str,
        Rank::Regex,
        Rank::Block,
        Rank::Builtin,
    ];

    pub fn is_num(self) -> bool {
        matches!(self, Rank::Int | Rank::Float | Rank::Complex)
    }

    pub fn is_seq(self) -> bool {
        matches!(self, Rank::List | Rank::Str | Rank::Regex)
    }

    pub fn is_func(self) -> bool {
        matches!(self, Rank::Block | Rank::Builtin)
    }

    pub fn is_chars(self) -> bool {
        matches!(self, Rank::Str | Rank::Regex)
    }
}

/// A deferred token sequence with a captured scope; invocable.
#[derive(Debug, Clone)]
pub struct BlockValue {
    pub tokens: Rc<Vec<Token>>,
    pub captured_scope: Scope,
    /// Whether invocation spawns a fresh child scope (`true`, `{ ... }`) or
    /// redirects writes straight into the captured scope (`false`,
    /// `\{ ... }`).
    pub scoped: bool,
}

impl BlockValue {
    /// Reconstruct the literal source text of this block, used by
    /// `convert`'s Block→Str/Regex rows ("serialize as `{…}`").
    pub fn source_text(&self) -> String {
        let mut out = String::from("{");
        for (i, tok) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&tok.raw);
        }
        out.push('}');
        out
    }
}

pub type Handler = fn(&mut Machine, &mut Context) -> Result<()>;

/// A registered builtin: one or more names it answers to, plus the handler
/// that implements it. Several names may point at the same `BuiltinDef`
/// (aliases); `Value::Builtin` holds a `'static` reference into the
/// process-wide builtins table.
pub struct BuiltinDef {
    pub names: &'static [&'static str],
    pub handler: Handler,
    pub doc: &'static str,
}

impl std::fmt::Debug for BuiltinDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuiltinDef({:?})", self.names)
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Int(BigInt),
    Float(f64),
    Complex(f64, f64),
    List(Rc<Vec<Value>>),
    Str(Rc<String>),
    Regex(Rc<RegexValue>),
    Block(Rc<BlockValue>),
    Builtin(&'static BuiltinDef),
}

impl Value {
    pub fn rank(&self) -> Rank {
        match self {
            Value::Int(_) => Rank::Int,
            Value::Float(_) => Rank::Float,
            Value::Complex(..) => Rank::Complex,
            Value::List(_) => Rank::List,
            Value::Str(_) => Rank::Str,
            Value::Regex(_) => Rank::Regex,
            Value::Block(_) => Rank::Block,
            Value::Builtin(_) => Rank::Builtin,
        }
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(s.into()))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn int(n: impl Into<BigInt>) -> Value {
        Value::Int(n.into())
    }

    /// Idempotent numeric narrowing: Complex→Float when the imaginary part
    /// is zero, then Float→Int when the result is mathematically integral.
    /// Identity outside the Num group.
    pub fn simplify(&self) -> Value {
        match self {
            Value::Complex(re, im) => {
                if *im == 0.0 {
                    Value::Float(*re).simplify()
                } else {
                    self.clone()
                }
            }
            Value::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e18 {
                    Value::Int(BigInt::from(*f as i64))
                } else {
                    self.clone()
                }
            }
            other => other.clone(),
        }
    }

    /// Whether this value is "truthy" for control-flow operators: zero
    /// numbers, empty sequences, and nothing else are falsy.
    pub fn truthy(&self) -> bool {
        match self.simplify() {
            Value::Int(n) => n != BigInt::from(0),
            Value::Float(f) => f != 0.0,
            Value::Complex(re, im) => re != 0.0 || im != 0.0,
            Value::List(items) => !items.is_empty(),
            Value::Str(s) => !s.is_empty(),
            Value::Regex(r) => !r.pattern.is_empty(),
            Value::Block(_) | Value::Builtin(_) => true,
        }
    }
}
