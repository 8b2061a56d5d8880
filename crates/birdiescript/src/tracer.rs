//! A pluggable execution tracer: the dispatch loop fires trace events at
//! token-step granularity and a zero-cost `NoopTracer` is the default, so
//! tracing never costs anything unless `-d` asks for it.

use crate::error::Error;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug, Clone)]
pub enum TraceEvent<'a> {
    Step { depth: usize, token: &'a Token },
    Call { depth: usize, name: &'a str },
    Define { depth: usize, name: &'a str, value: &'a Value },
    Error { depth: usize, error: &'a Error },
}

pub trait Tracer {
    fn trace(&mut self, event: TraceEvent<'_>);
}

#[derive(Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline]
    fn trace(&mut self, _event: TraceEvent<'_>) {}
}

/// Backs `-d`: prints a one-line unwind/step trace to stderr.
#[derive(Debug, Default)]
pub struct StderrTracer;

impl Tracer for StderrTracer {
    fn trace(&mut self, event: TraceEvent<'_>) {
        match event {
            TraceEvent::Step { depth, token } => {
                eprintln!("{}step {}", "  ".repeat(depth), token.raw);
            }
            TraceEvent::Call { depth, name } => {
                eprintln!("{}call {name}", "  ".repeat(depth));
            }
            TraceEvent::Define { depth, name, value } => {
                eprintln!("{}define {name} = {value}", "  ".repeat(depth));
            }
            TraceEvent::Error { depth, error } => {
                eprintln!("{}error: {error}", "  ".repeat(depth));
            }
        }
    }
}
