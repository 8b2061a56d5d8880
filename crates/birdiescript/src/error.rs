//! The error taxonomy: a `strum`-derived enum with a hand-written
//! `Display` rather than pulling in `thiserror`.

use strum::IntoStaticStr;

use crate::value::Rank;

/// Every way a running script can fail.
#[derive(Debug, Clone, IntoStaticStr)]
pub enum Error {
    /// The lexer could not classify the next token.
    Syntax { offset: usize, message: String },
    /// An operator was asked to dispatch on operand types it has no arm for.
    Type {
        operator: &'static str,
        ranks: Vec<Rank>,
    },
    /// `convert` has no entry for the given (source, target) rank pair.
    Coercion { from: Rank, to: Rank },
    /// Dereference of a name with no binding in scope or in the builtins
    /// table.
    Name { name: String },
    /// A domain-specific error: bad base, zero divisor, wrong vector arity,
    /// and so on.
    Value { message: String },
    /// A capability call failed.
    Io { message: String },
    /// Context nesting exceeded the configured recursion budget.
    RecursionLimit { limit: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax { offset, message } => {
                write!(f, "SyntaxError at offset {offset}: {message}")
            }
            Error::Type { operator, ranks } => {
                write!(f, "TypeError: `{operator}` cannot dispatch on {ranks:?}")
            }
            Error::Coercion { from, to } => {
                write!(f, "CoercionError: cannot convert {from:?} to {to:?}")
            }
            Error::Name { name } => write!(f, "NameError: `{name}` is not defined"),
            Error::Value { message } => write!(f, "ValueError: {message}"),
            Error::Io { message } => write!(f, "IOError: {message}"),
            Error::RecursionLimit { limit } => {
                write!(f, "RecursionLimit: exceeded depth budget of {limit}")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
