//! The library's public entry point. Unlike a staged/resumable
//! `RunProgress` (built for pausing on external function calls
//! mid-bytecode-program), Birdiescript's `Runner` runs a script to
//! completion or to an error in one call, since the foreign-code escape
//! hatch is out of core scope and nothing else suspends execution.

use std::rc::Rc;

use crate::builtins::TABLE;
use crate::capability::Capabilities;
use crate::context::{run as run_dispatch, Context};
use crate::error::Result;
use crate::lexer;
use crate::scope::Scope;
use crate::tracer::{NoopTracer, Tracer};
use crate::value::Value;

/// Construction-time knobs for a `Runner`: the recursion budget, the text
/// encoding pre-bound for `%f`-style formatting built-ins, and the tracer
/// to fire dispatch events into.
pub struct RunnerOptions {
    pub max_depth: usize,
    pub encoding: String,
    pub tracer: Box<dyn Tracer>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        RunnerOptions {
            max_depth: 1024,
            encoding: "utf-8".to_string(),
            tracer: Box::new(NoopTracer),
        }
    }
}

/// The single entry point into the interpreter. Owns the persistent
/// pieces of state a script (or a REPL session running one line at a
/// time) needs across calls: the operand stack, the list-mark stack, and
/// the root Context's scope.
pub struct Runner {
    ctx: Context,
    stack: Vec<Value>,
    list_marks: Vec<usize>,
    capabilities: Capabilities,
    tracer: Box<dyn Tracer>,
    max_depth: usize,
    encoding: String,
}

impl Runner {
    /// Parse `source` and build a fresh root Context, but do not run it
    /// yet — call `run` to drive it to completion.
    pub fn new(source: &str, capabilities: Capabilities, options: RunnerOptions) -> Result<Self> {
        let tokens = lexer::tokenize(source)?;
        let ctx = Context::root(tokens, Scope::new_root());
        Ok(Runner {
            ctx,
            stack: Vec::new(),
            list_marks: Vec::new(),
            capabilities,
            tracer: options.tracer,
            max_depth: options.max_depth,
            encoding: options.encoding,
        })
    }

    /// Run the parsed script to completion (or to the first unhandled
    /// error). Returns the final stack, bottom to top.
    pub fn run(&mut self) -> Result<Vec<Value>> {
        self.drive()
    }

    /// Tokenize and run one additional line against the same root Context
    /// (same scope, same stack), for the REPL driver. Returns the stack
    /// snapshot after the line runs.
    pub fn run_line(&mut self, line: &str) -> Result<Vec<Value>> {
        let tokens = lexer::tokenize(line)?;
        self.ctx.tokens = Rc::new(tokens);
        self.ctx.cursor = 0;
        self.ctx.broken = crate::context::Broken::Idle;
        self.drive()
    }

    /// Bind a pre-bound name (`A` for CLI args, `.enc`-style encoding
    /// state, etc.) into the root scope before running.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.ctx.scope.set(name, value);
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Build a transient `Machine` borrowing only the fields it needs
    /// (stack and list-marks by value, capabilities/tracer by mutable
    /// reference), run the dispatch loop, then fold the stack back in.
    fn drive(&mut self) -> Result<Vec<Value>> {
        let mut machine = crate::context::Machine {
            stack: std::mem::take(&mut self.stack),
            list_marks: std::mem::take(&mut self.list_marks),
            builtins: &TABLE,
            capabilities: &mut self.capabilities,
            tracer: self.tracer.as_mut(),
            encoding: self.encoding.clone(),
            max_depth: self.max_depth,
            depth: 0,
        };
        let result = run_dispatch(&mut machine, &mut self.ctx);
        self.stack = machine.stack;
        self.list_marks = machine.list_marks;
        result?;
        Ok(self.stack.clone())
    }
}
