#![doc = include_str!("../../../README.md")]

mod builtins;
pub mod capability;
mod context;
mod error;
mod lexer;
mod ops;
mod run;
mod scope;
pub mod tracer;
mod token;
mod value;

pub use crate::{
    capability::{Capabilities, ClockCapability, ForeignCapability, IoCapability, NullCapabilities, RandomCapability, StdCapabilities},
    error::{Error, Result},
    run::{Runner, RunnerOptions},
    token::{Role, Tier, Token, TokenKind},
    tracer::{NoopTracer, StderrTracer, TraceEvent, Tracer},
    value::{compare, convert, coerce, strict_eq, BlockValue, BuiltinDef, Rank, RegexFlags, RegexValue, Value},
};

pub use crate::lexer::tokenize;
