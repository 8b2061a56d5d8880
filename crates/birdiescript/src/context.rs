//! The shared machine state and the per-activation Context tree, the
//! dispatch loop (`step`/`run`), and the three-tier scope resolver.
//!
//! Adapted from the original interpreter's single-threaded Python object
//! graph, where a new Context created for a Block invocation *aliases* its
//! caller's operand stack and list-mark stack (the same mutable list
//! object) while owning its own scope map and control-flow flags. Rust
//! ownership makes that aliasing awkward to express directly, so the
//! operand stack and list-mark stack live once on `Machine` (the single
//! piece of state every Context shares), while `Context` owns only what
//! was genuinely per-activation in the original: the token cursor, scope,
//! pending-block buffer, and break/return/loop flags. The parent chain
//! itself is an owned `Box` list with explicit drop.

use std::rc::Rc;

use crate::builtins::BuiltinTable;
use crate::capability::Capabilities;
use crate::error::{Error, Result};
use crate::scope::Scope;
use crate::token::{normalize_name, split_tier, Role, Tier, Token, TokenKind};
use crate::tracer::{TraceEvent, Tracer};
use crate::value::{BlockValue, Value};

/// The three non-running states a Context can be in: `Idle` (running
/// normally), `Set` (a break or return is unwinding through this
/// Context), `Exited` (the whole script is unwinding and must not be
/// cleared by any enclosing loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Broken {
    Idle,
    Set,
    Exited,
}

/// The buffer a Context accumulates raw tokens into while a block literal
/// is open.
#[derive(Debug)]
pub struct PendingBlock {
    pub tokens: Vec<Token>,
    pub nesting: u32,
    pub scoped: bool,
}

/// One activation record. See the module doc comment for what moved to
/// `Machine` and why.
#[derive(Debug)]
pub struct Context {
    pub parent: Option<Box<Context>>,
    pub tokens: Rc<Vec<Token>>,
    pub cursor: usize,
    pub scope: Scope,
    /// Whether `define` at the Local tier may write here directly. `false`
    /// for a non-scoped block's execution Context and for every
    /// NONLOCAL-boundary wrapper Context (both redirect writes to a
    /// captured scope rather than a fresh one of their own).
    pub scoped: bool,
    /// Marks the wrapper Context a block invocation plants between the
    /// caller and the executing body, the landing point for `Rt`'s
    /// return-to-caller unwind.
    pub nonlocal_boundary: bool,
    /// Set for the duration of a loop body's single step; `Bk`/`Br`
    /// consume one unit of break-count per Context with this flag set.
    pub looping: bool,
    pub broken: Broken,
    pub pending: Option<PendingBlock>,
}

impl Context {
    pub fn root(tokens: Vec<Token>, scope: Scope) -> Self {
        Context {
            parent: None,
            tokens: Rc::new(tokens),
            cursor: 0,
            scope,
            scoped: true,
            nonlocal_boundary: false,
            looping: false,
            broken: Broken::Idle,
            pending: None,
        }
    }

    fn child(tokens: Rc<Vec<Token>>, scope: Scope, scoped: bool) -> Self {
        Context {
            parent: None,
            tokens,
            cursor: 0,
            scope,
            scoped,
            nonlocal_boundary: false,
            looping: false,
            broken: Broken::Idle,
            pending: None,
        }
    }

    fn mut_parent(&mut self) -> Option<&mut Context> {
        self.parent.as_deref_mut()
    }
}

/// The singleton state every Context shares: the operand stack, the
/// list-mark stack, the read-only builtins table, capabilities, the
/// tracer, and the recursion budget. See the module doc comment.
pub struct Machine<'a> {
    pub stack: Vec<Value>,
    pub list_marks: Vec<usize>,
    pub builtins: &'static BuiltinTable,
    pub capabilities: &'a mut Capabilities,
    pub tracer: &'a mut dyn Tracer,
    pub encoding: String,
    pub max_depth: usize,
    pub depth: usize,
}

impl<'a> Machine<'a> {
    pub fn push(&mut self, v: Value) {
        self.stack.push(v);
    }

    pub fn queue(&mut self, v: Value) {
        self.stack.insert(0, v);
        for mark in &mut self.list_marks {
            *mark += 1;
        }
    }

    /// Popping an empty stack returns `Int(0)` and emits a warning rather
    /// than erroring.
    pub fn pop(&mut self) -> Value {
        match self.stack.pop() {
            Some(v) => {
                self.adjust_leftbs(self.stack.len());
                v
            }
            None => {
                eprintln!("warning: pop on empty stack");
                Value::int(0)
            }
        }
    }

    pub fn peek(&self, k: isize) -> Value {
        if self.stack.is_empty() {
            return Value::int(0);
        }
        let len = self.stack.len() as isize;
        let mut idx = if k < 0 { len + k } else { k };
        idx = idx.rem_euclid(len);
        self.stack[idx as usize].clone()
    }

    pub fn pop_till(&mut self, n: usize) -> Vec<Value> {
        let n = n.min(self.stack.len());
        let drained = self.stack.split_off(n);
        self.adjust_leftbs(self.stack.len());
        drained
    }

    /// Whenever the stack shortens, every list-mark at or beyond the new
    /// length must shrink to stay valid.
    fn adjust_leftbs(&mut self, new_len: usize) {
        for mark in &mut self.list_marks {
            if *mark > new_len {
                *mark = new_len;
            }
        }
    }

    pub fn mark_list_start(&mut self) {
        self.list_marks.push(self.stack.len());
    }

    /// `]`: pop the top mark (defaulting to 0 if none is open), collect
    /// everything above that position into a List.
    pub fn close_list(&mut self) -> Value {
        let mark = self.list_marks.pop().unwrap_or(0).min(self.stack.len());
        let items = self.stack.split_off(mark);
        Value::list(items)
    }
}

// ---------------------------------------------------------------------
// Scope resolution
// ---------------------------------------------------------------------

/// `define(name, value, tier)`.
pub fn define(ctx: &mut Context, name: &str, value: Value, tier: Tier) {
    match tier {
        Tier::Local => ctx.scope.set(name, value),
        Tier::Global => {
            let mut cur = ctx;
            while let Some(parent) = cur.mut_parent() {
                cur = parent;
            }
            cur.scope.set(name, value);
        }
        Tier::Nonlocal => define_nonlocal(ctx, name, value),
    }
}

/// Nonlocal define always skips the originating Context, then writes into
/// the first ancestor that already binds `name`, falling back to the root
/// if none does.
fn define_nonlocal(ctx: &mut Context, name: &str, value: Value) {
    let Some(mut cur) = ctx.mut_parent() else {
        ctx.scope.set(name, value);
        return;
    };
    loop {
        if cur.scope.contains(name) {
            cur.scope.set(name, value);
            return;
        }
        match cur.mut_parent() {
            Some(parent) => cur = parent,
            None => {
                cur.scope.set(name, value);
                return;
            }
        }
    }
}

/// `undefine(name, tier)`: symmetric with `define`.
pub fn undefine(ctx: &mut Context, name: &str, tier: Tier) {
    match tier {
        Tier::Local => ctx.scope.remove(name),
        Tier::Global => {
            let mut cur = ctx;
            while let Some(parent) = cur.mut_parent() {
                cur = parent;
            }
            cur.scope.remove(name);
        }
        Tier::Nonlocal => {
            let Some(mut cur) = ctx.mut_parent() else {
                ctx.scope.remove(name);
                return;
            };
            loop {
                if cur.scope.contains(name) {
                    cur.scope.remove(name);
                    return;
                }
                match cur.mut_parent() {
                    Some(parent) => cur = parent,
                    None => {
                        cur.scope.remove(name);
                        return;
                    }
                }
            }
        }
    }
}

/// `dereference(name, tier)`.
pub fn dereference(machine: &Machine, ctx: &Context, name: &str, tier: Tier) -> Result<Value> {
    match tier {
        Tier::Local => {
            let mut cur = Some(ctx);
            while let Some(c) = cur {
                if let Some(v) = c.scope.get(name) {
                    return Ok(v);
                }
                cur = c.parent.as_deref();
            }
            builtin_lookup(machine, name)
        }
        Tier::Global => {
            let mut cur = ctx;
            while let Some(parent) = parent_ref(cur) {
                cur = parent;
            }
            cur.scope
                .get(name)
                .map(Ok)
                .unwrap_or_else(|| builtin_lookup(machine, name))
        }
        Tier::Nonlocal => {
            let Some(mut cur) = ctx.parent.as_deref() else {
                return builtin_lookup(machine, name);
            };
            loop {
                if let Some(v) = cur.scope.get(name) {
                    return Ok(v);
                }
                match cur.parent.as_deref() {
                    Some(parent) => cur = parent,
                    None => return builtin_lookup(machine, name),
                }
            }
        }
    }
}

fn parent_ref(ctx: &Context) -> Option<&Context> {
    ctx.parent.as_deref()
}

fn builtin_lookup(machine: &Machine, name: &str) -> Result<Value> {
    machine
        .builtins
        .lookup(name)
        .map(Value::Builtin)
        .ok_or_else(|| Error::Name { name: name.to_string() })
}

/// A quiet variant used by dispatch rule 5's raw-text constant-shadowing
/// check: a miss is not an error there, just "no shadow exists."
pub fn dereference_quiet(machine: &Machine, ctx: &Context, name: &str) -> Option<Value> {
    dereference(machine, ctx, name, Tier::Local).ok()
}

// ---------------------------------------------------------------------
// Applying values (spec: "Most values push themselves"; Block and
// Builtin override that with invocation)
// ---------------------------------------------------------------------

/// Apply a value to the running Context: push it if it is plain data,
/// invoke it if it is a Block or Builtin. `looping` is threaded through to
/// mark the freshly-created wrapper Context for a Block invocation, so
/// `Bk`/`Br` know which ancestors count toward their break budget.
pub fn apply_value(machine: &mut Machine, ctx: &mut Context, value: &Value, looping: bool) -> Result<()> {
    match value {
        Value::Block(block) => call_block(machine, ctx, block, looping),
        Value::Builtin(b) => {
            machine.tracer.trace(TraceEvent::Call {
                depth: machine.depth,
                name: b.names.first().copied().unwrap_or("?"),
            });
            (b.handler)(machine, ctx)
        }
        other => {
            machine.push(other.clone());
            Ok(())
        }
    }
}

/// Invoke a Block: splice in a NONLOCAL-boundary wrapper Context (carrying
/// the block's captured scope and the `looping` flag) between the caller
/// and a fresh executing Context for the block's own tokens, run it to
/// completion or to a break/return/error, then unwrap both layers back
/// into `ctx`.
///
/// This takes `ctx` by mutable reference and temporarily moves its
/// contents out via `std::mem::take` (Context implements `Default`) rather
/// than taking `Context` by value, so callers never have to restructure
/// around ownership — the effect on `*ctx` is exactly the original's
/// "the caller Context is inert while the nested one runs, then resumes
/// unchanged except for whatever broke through it."
pub fn call_block(machine: &mut Machine, ctx: &mut Context, block: &Rc<BlockValue>, looping: bool) -> Result<()> {
    if machine.depth >= machine.max_depth {
        return Err(Error::RecursionLimit { limit: machine.max_depth });
    }
    machine.depth += 1;
    let caller = std::mem::take(ctx);

    let mut wrapper = Context::child(Rc::new(Vec::new()), block.captured_scope.clone(), false);
    wrapper.looping = looping;
    wrapper.nonlocal_boundary = true;
    wrapper.parent = Some(Box::new(caller));

    let exec_scope = if block.scoped {
        Scope::new_root()
    } else {
        block.captured_scope.clone()
    };
    let mut exec = Context::child(Rc::clone(&block.tokens), exec_scope, block.scoped);
    exec.parent = Some(Box::new(wrapper));

    let result = run(machine, &mut exec);

    // Unwind: wrapper.looping is reset unconditionally (mirrors the
    // original's `finally: parent.looping = False`), independent of
    // whether the call raised.
    let mut wrapper = *exec.parent.take().expect("wrapper present");
    wrapper.looping = false;
    let caller = *wrapper.parent.take().expect("caller present");
    *ctx = caller;
    machine.depth -= 1;
    result
}

/// The dispatch loop: step tokens until the cursor runs off the end or a
/// break/return/exit sets `broken`.
pub fn run(machine: &mut Machine, ctx: &mut Context) -> Result<()> {
    let tokens = Rc::clone(&ctx.tokens);
    while ctx.cursor < tokens.len() && ctx.broken == Broken::Idle {
        let token = &tokens[ctx.cursor];
        machine.tracer.trace(TraceEvent::Step {
            depth: machine.depth,
            token,
        });
        if let Err(e) = step(machine, ctx, token) {
            machine.tracer.trace(TraceEvent::Error {
                depth: machine.depth,
                error: &e,
            });
            return Err(e);
        }
        ctx.cursor += 1;
    }
    Ok(())
}

fn step(machine: &mut Machine, ctx: &mut Context, token: &Token) -> Result<()> {
    if matches!(token.kind, TokenKind::Comment | TokenKind::BlockComment) {
        return Ok(());
    }
    if let TokenKind::BlockStart { scoped } = token.kind {
        match ctx.pending.as_mut() {
            Some(pending) => {
                pending.nesting += 1;
                pending.tokens.push(token.clone());
            }
            None => {
                ctx.pending = Some(PendingBlock {
                    tokens: Vec::new(),
                    nesting: 1,
                    scoped,
                });
            }
        }
        return Ok(());
    }
    let defcall = match &token.kind {
        TokenKind::Name {
            role: Role::DefCall,
            tier,
            text,
        } => Some((*tier, text.clone())),
        _ => None,
    };
    if matches!(token.kind, TokenKind::BlockEnd) || defcall.is_some() {
        return close_block(machine, ctx, token, defcall);
    }
    if let Some(pending) = ctx.pending.as_mut() {
        pending.tokens.push(token.clone());
        return Ok(());
    }
    dispatch_token(machine, ctx, token)
}

fn close_block(
    machine: &mut Machine,
    ctx: &mut Context,
    token: &Token,
    defcall: Option<(Option<Tier>, String)>,
) -> Result<()> {
    let pending = ctx.pending.as_mut().ok_or_else(|| Error::Value {
        message: format!("`{}` with no matching block start", token.raw),
    })?;
    if pending.nesting > 1 {
        pending.nesting -= 1;
        pending.tokens.push(token.clone());
        return Ok(());
    }
    let pending = ctx.pending.take().expect("checked above");
    let block = Rc::new(BlockValue {
        tokens: Rc::new(pending.tokens),
        captured_scope: ctx.scope.clone(),
        scoped: pending.scoped,
    });
    match defcall {
        None => {
            machine.push(Value::Block(block));
            Ok(())
        }
        Some((tier, text)) => {
            let (tier_letter, rest) = split_tier(&text);
            let tier = tier.or(tier_letter).unwrap_or(Tier::Local);
            let name = normalize_name(rest);
            define(ctx, &name, Value::Block(Rc::clone(&block)), tier);
            machine.tracer.trace(TraceEvent::Define {
                depth: machine.depth,
                name: &name,
                value: &Value::Block(Rc::clone(&block)),
            });
            apply_value(machine, ctx, &Value::Block(block), false)
        }
    }
}

fn dispatch_token(machine: &mut Machine, ctx: &mut Context, token: &Token) -> Result<()> {
    match &token.kind {
        TokenKind::Name { role, tier, text } => {
            let (tier_letter, rest) = split_tier(text);
            let tier = tier.or(tier_letter).unwrap_or(Tier::Local);
            let name = normalize_name(rest);
            perform_role(machine, ctx, *role, tier, &name)
        }
        TokenKind::Literal(value) => {
            if let Some(bound) = dereference_quiet(machine, ctx, &token.raw) {
                apply_value(machine, ctx, &bound, false)
            } else {
                machine.push(value.clone());
                Ok(())
            }
        }
        TokenKind::BlockStart { .. } | TokenKind::BlockEnd | TokenKind::Comment | TokenKind::BlockComment => {
            unreachable!("handled in step()")
        }
    }
}

fn perform_role(machine: &mut Machine, ctx: &mut Context, role: Role, tier: Tier, name: &str) -> Result<()> {
    match role {
        Role::Call | Role::CallExplicit => {
            let value = dereference(machine, ctx, name, tier)?;
            apply_value(machine, ctx, &value, false)
        }
        Role::Ref => {
            let value = dereference(machine, ctx, name, tier)?;
            machine.push(value);
            Ok(())
        }
        Role::Def => {
            let value = machine.peek(-1);
            define(ctx, name, value.clone(), tier);
            machine.tracer.trace(TraceEvent::Define {
                depth: machine.depth,
                name,
                value: &value,
            });
            Ok(())
        }
        Role::Undef => {
            undefine(ctx, name, tier);
            Ok(())
        }
        Role::DefCall => unreachable!("handled in close_block()"),
    }
}

// ---------------------------------------------------------------------
// Break / Return / Exit unwinding
// ---------------------------------------------------------------------

/// `Bk n`: walk up from `ctx`, marking every visited Context broken and
/// decrementing `n` once per Context that was `looping` at the moment of
/// unwind, stopping once `n` reaches zero — and then marking one Context
/// further, unconditionally, so the immediately enclosing loop construct
/// (whose own running Context is that next one) observes the break.
pub fn break_n(ctx: &mut Context, mut n: u32) {
    let mut cur = ctx;
    while n > 0 {
        if cur.broken != Broken::Exited {
            cur.broken = Broken::Set;
        }
        if cur.looping {
            cur.looping = false;
            n -= 1;
        }
        match cur.mut_parent() {
            Some(parent) => cur = parent,
            None => return,
        }
        if n == 0 {
            if cur.broken != Broken::Exited {
                cur.broken = Broken::Set;
            }
            return;
        }
    }
}

/// `Rt`: two-pass unwind. First skip every non-scoped Context (the
/// non-scoped-block execution Contexts a Return might be nested inside),
/// then continue up marking broken until reaching the NONLOCAL-boundary
/// wrapper Context planted by the enclosing Block invocation, inclusive.
pub fn return_from(ctx: &mut Context) {
    let mut cur = ctx;
    while !cur.scoped {
        if cur.broken != Broken::Exited {
            cur.broken = Broken::Set;
        }
        match cur.mut_parent() {
            Some(parent) => cur = parent,
            None => return,
        }
    }
    while !cur.nonlocal_boundary {
        if cur.broken != Broken::Exited {
            cur.broken = Broken::Set;
        }
        match cur.mut_parent() {
            Some(parent) => cur = parent,
            None => return,
        }
    }
    cur.broken = Broken::Set;
}

/// `Ex`: set `broken = Exited` on every ancestor, unconditionally
/// unwinding to the top. Nothing clears `Exited`.
pub fn exit_all(ctx: &mut Context) {
    let mut cur = Some(ctx);
    while let Some(c) = cur {
        c.broken = Broken::Exited;
        c.looping = false;
        cur = c.mut_parent();
    }
}

/// Absorb a plain break once a loop construct (`D`/`Du`/`W`) has observed
/// it, leaving `Exited` to keep propagating. Shared by every looping
/// builtin: clear `broken` back to `Idle` unless it's already `Exited`.
pub fn absorb_break(ctx: &mut Context) {
    if ctx.broken != Broken::Exited {
        ctx.broken = Broken::Idle;
    }
}

impl Default for Context {
    fn default() -> Self {
        Context {
            parent: None,
            tokens: Rc::new(Vec::new()),
            cursor: 0,
            scope: Scope::new_root(),
            scoped: true,
            nonlocal_boundary: false,
            looping: false,
            broken: Broken::Idle,
            pending: None,
        }
    }
}
