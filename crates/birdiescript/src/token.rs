//! Token kinds and the name-role parser.
//!
//! Literal-producing lexical forms (int, float/complex, str, heredoc,
//! herestr, chars, regex) are parsed once, at lex time, into their final
//! `Value` — mirroring the original interpreter's eager `BToken.value`
//! construction rather than re-parsing text on every execution of a block.

use std::fmt;

use crate::value::Value;

/// The scope tier a prefixed name can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Local,
    Global,
    Nonlocal,
}

/// How a name token behaves when it is reached by the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Bare name: look up and invoke.
    Call,
    /// `\name`: look up and push, never invoke.
    Ref,
    /// `:name`: bind top-of-stack to name without popping it.
    Def,
    /// `:\name`: remove a binding.
    Undef,
    /// `\}name` at a matching blockend: bind the block AND invoke it.
    DefCall,
    /// `\:name`: identical to `Call`, used to force a call where a bare
    /// name would otherwise be read as a different role.
    CallExplicit,
}

#[derive(Debug, Clone)]
pub enum TokenKind {
    Comment,
    BlockComment,
    BlockStart { scoped: bool },
    BlockEnd,
    Literal(Value),
    /// A name token, already split into its role, scope tier (if any), and
    /// case-normalized text.
    Name {
        role: Role,
        tier: Option<Tier>,
        text: String,
    },
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// The raw, unnormalized source text this token was lexed from. Used by
    /// dispatch rule 5 ("look up the token's raw text as a name first") and
    /// by error messages.
    pub raw: String,
    pub offset: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Case-normalize a name's text: first character upper, remainder lower.
/// Applied after a tier letter (if any) has already been stripped off the
/// front.
pub fn normalize_name(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(|c| c.to_lowercase()));
            out
        }
    }
}

/// Split a name's text into an optional tier letter and the remaining
/// text: a leading `l`/`g`/`n` is a scope-tier marker orthogonal to a
/// name's Role, so it is recognized uniformly at dispatch time even on a
/// bare, unprefixed Call-role name, not only on the explicitly prefixed
/// forms (`:`/`\`/`\:`/`:\`/`\}`).
pub fn split_tier(text: &str) -> (Option<Tier>, &str) {
    let mut chars = text.chars();
    match chars.next() {
        Some('l') if text.len() > 1 => (Some(Tier::Local), &text[1..]),
        Some('g') if text.len() > 1 => (Some(Tier::Global), &text[1..]),
        Some('n') if text.len() > 1 => (Some(Tier::Nonlocal), &text[1..]),
        _ => (None, text),
    }
}
