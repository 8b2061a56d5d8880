//! Regex-assisted scanner: a single forward sweep over the
//! source producing a flat token vector. Literal-producing lexical forms
//! are parsed straight to their final `Value` here rather than deferred to
//! dispatch time (see `token.rs`'s doc comment).

use std::sync::OnceLock;

use num_bigint::BigInt;

use crate::error::{Error, Result};
use crate::token::{Role, Tier, Token, TokenKind};
use crate::value::{RegexFlags, RegexValue, Value};

/// Base letters in base-ascending order: base 2 is `i`, base 3
/// is `t`, ..., base 16 is `x`.
const BASE_LETTERS: &str = "itqphsonkuzrwvx";
const REGEX_FLAG_LETTERS: &str = "abfilmersuvwx";

fn name_continuation_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[a-z]*").unwrap())
}

fn number_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    // digits, optional fractional part / exponent (float/complex), else
    // plain digits for Int; the caller decides which regime applies by
    // what trails the digits.
    RE.get_or_init(|| {
        regex::Regex::new(r"^(?P<int>[0-9a-fA-F]+)(?P<frac>\.[0-9]+)?(?P<exp>[eE][+-]?[0-9]+)?").unwrap()
    })
}

pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    while pos < src.len() {
        let skipped = src[pos..].len() - src[pos..].trim_start().len();
        pos += skipped;
        if pos >= src.len() {
            break;
        }
        let start = pos;
        let rest = &src[pos..];

        if rest.starts_with("::") {
            let end = rest.find('\n').unwrap_or(rest.len());
            pos += end;
            tokens.push(tok(TokenKind::Comment, &rest[..end], start));
            continue;
        }
        if rest.starts_with(":{") {
            let close = rest.find(":}").ok_or_else(|| syntax_error(start, "unterminated block comment"))?;
            let end = close + 2;
            pos += end;
            tokens.push(tok(TokenKind::BlockComment, &rest[..end], start));
            continue;
        }
        if rest.starts_with("\\ ") {
            let end = rest.find('\n').unwrap_or(rest.len());
            let body = rest[2..end].to_string();
            pos += end;
            tokens.push(tok(TokenKind::Literal(Value::str(body)), &rest[..end], start));
            continue;
        }
        if let Some((text, consumed)) = try_heredoc(rest) {
            pos += consumed;
            tokens.push(tok(TokenKind::Literal(Value::str(text)), &rest[..consumed], start));
            continue;
        }
        if rest.starts_with("\\{") {
            pos += 2;
            tokens.push(tok(TokenKind::BlockStart { scoped: false }, "\\{", start));
            continue;
        }
        if rest.starts_with('{') {
            pos += 1;
            tokens.push(tok(TokenKind::BlockStart { scoped: true }, "{", start));
            continue;
        }
        if rest.starts_with('}') {
            pos += 1;
            tokens.push(tok(TokenKind::BlockEnd, "}", start));
            continue;
        }

        let (consumed, token) = lex_general(rest, start)?;
        pos += consumed;
        tokens.push(token);
    }
    Ok(tokens)
}

fn tok(kind: TokenKind, raw: &str, offset: usize) -> Token {
    Token {
        kind,
        raw: raw.to_string(),
        offset,
    }
}

fn syntax_error(offset: usize, message: impl Into<String>) -> Error {
    Error::Syntax {
        offset,
        message: message.into(),
    }
}

/// `\[-]DELIM WS ... DELIM`: a delimiter word, then everything up to the
/// next standalone occurrence of that same delimiter.
fn try_heredoc(rest: &str) -> Option<(String, usize)> {
    let body = rest.strip_prefix('\\')?;
    let strip_leading_ws = body.starts_with('-');
    let body = if strip_leading_ws { &body[1..] } else { body };
    let delim_len = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    if delim_len == 0 {
        return None;
    }
    let delim = &body[..delim_len];
    let after_delim = &body[delim_len..];
    let ws_len = after_delim.len() - after_delim.trim_start().len();
    let content_start = delim_len + ws_len;
    let content = &body[content_start..];
    let end_in_content = content.find(delim)?;
    let mut text = content[..end_in_content].to_string();
    if strip_leading_ws {
        text = text
            .lines()
            .map(str::trim_start)
            .collect::<Vec<_>>()
            .join("\n");
    }
    let consumed = 1 + (if strip_leading_ws { 1 } else { 0 }) + content_start + end_in_content + delim_len;
    Some((text, consumed))
}

/// Handles the optional prefix/tier group followed by
/// complex/int/regex/str/chars/name, in that priority order.
fn lex_general(rest: &str, offset: usize) -> Result<(usize, Token)> {
    let (prefix_kind, prefix_len) = match_prefix(rest);
    let after_prefix = &rest[prefix_len..];

    // A prefix with nothing nameable after it is not actually a prefix —
    // it is itself a one-character name (e.g. a bare `:` used as its own
    // builtin name). Fall through to the plain name rule on the whole
    // original text in that case.
    if prefix_len > 0 && !can_start_name(after_prefix) {
        return lex_name(rest, offset, Role::Call, None);
    }

    if prefix_len == 0 {
        if let Some(v) = try_complex_or_int(rest)? {
            return Ok(v);
        }
        if let Some(v) = try_regex_or_str(rest, offset)? {
            return Ok(v);
        }
        if let Some(v) = try_chars(rest, offset)? {
            return Ok(v);
        }
        return lex_name(rest, offset, Role::Call, None);
    }

    let role = match prefix_kind {
        PrefixKind::Def => Role::Def,
        PrefixKind::Undef => Role::Undef,
        PrefixKind::Ref => Role::Ref,
        PrefixKind::CallExplicit => Role::CallExplicit,
        PrefixKind::DefCall => Role::DefCall,
        PrefixKind::None => unreachable!("prefix_len > 0 implies a recognized prefix"),
    };
    lex_name(rest, offset, role, Some(prefix_len))
}

fn can_start_name(s: &str) -> bool {
    !s.is_empty() && !s.starts_with(char::is_whitespace) && !s.starts_with(['{', '}'])
}

#[derive(Clone, Copy)]
enum PrefixKind {
    None,
    Def,
    Undef,
    Ref,
    CallExplicit,
    DefCall,
}

/// Longest-match-first so `:\` and `\:` are recognized before bare `:`/`\`.
fn match_prefix(rest: &str) -> (PrefixKind, usize) {
    if rest.starts_with(":\\") {
        (PrefixKind::Undef, 2)
    } else if rest.starts_with("\\:") {
        (PrefixKind::CallExplicit, 2)
    } else if rest.starts_with("\\}") {
        (PrefixKind::DefCall, 2)
    } else if rest.starts_with(':') {
        (PrefixKind::Def, 1)
    } else if rest.starts_with('\\') {
        (PrefixKind::Ref, 1)
    } else {
        (PrefixKind::None, 0)
    }
}

fn lex_name(rest: &str, offset: usize, role: Role, prefix_len: Option<usize>) -> Result<(usize, Token)> {
    let prefix_len = prefix_len.unwrap_or(0);
    let body = &rest[prefix_len..];
    let mut chars = body.char_indices();
    let (lead_len, _lead) = match chars.next() {
        Some((_, c)) => (c.len_utf8(), c),
        None => return Err(syntax_error(offset, "expected a name after prefix")),
    };
    let cont = name_continuation_re()
        .find(&body[lead_len..])
        .map(|m| m.end())
        .unwrap_or(0);
    let name_len = lead_len + cont;
    let total_len = prefix_len + name_len;
    let text = &body[..name_len];
    // Tier-letter stripping and case normalization happen at dispatch time
    // (`context::dispatch_token`/`close_block`), not here: a bare call's
    // text is never tier-split, only an explicitly prefixed name's is, and
    // the lexer has no way to tell those apart from a role alone once a
    // prefix has been consumed.
    let kind = TokenKind::Name {
        role,
        tier: None,
        text: text.to_string(),
    };
    Ok((total_len, tok(kind, &rest[..total_len], offset)))
}

fn try_complex_or_int(rest: &str) -> Result<Option<(usize, Token)>> {
    let caps = match number_re().captures(rest) {
        Some(c) if c.name("int").is_some() => c,
        _ => return Ok(None),
    };
    let whole = caps.get(0).unwrap();
    let mut len = whole.end();
    let is_float_shaped = caps.name("frac").is_some() || caps.name("exp").is_some();
    let int_digits = caps.name("int").unwrap().as_str();

    if is_float_shaped {
        let mantissa: f64 = whole.as_str().parse().map_err(|_| {
            syntax_error(0, format!("invalid numeric literal `{}`", whole.as_str()))
        })?;
        let mut value = mantissa;
        let mut imaginary = false;
        if rest[len..].starts_with('j') {
            imaginary = true;
            len += 1;
        }
        if rest[len..].starts_with('m') {
            value = -value;
            len += 1;
        }
        let parsed = if imaginary {
            Value::Complex(0.0, value)
        } else {
            Value::Float(value)
        };
        return Ok(Some((len, tok(TokenKind::Literal(parsed), &rest[..len], 0))));
    }

    // Plain digit run: look for a trailing base letter, else base 10
    // (base 16 if the literal leads with `0`).
    let mut base = if int_digits.starts_with('0') { 16 } else { 10 };
    if let Some(letter) = rest[len..].chars().next() {
        if let Some(idx) = BASE_LETTERS.find(letter) {
            base = idx as u32 + 2;
            len += letter.len_utf8();
        }
    }
    let digits = &int_digits[..int_digits.len()];
    let mut n = BigInt::parse_bytes(digits.as_bytes(), base).ok_or_else(|| {
        syntax_error(0, format!("`{digits}` is not valid in base {base}"))
    })?;
    if rest[len..].starts_with('m') {
        n = -n;
        len += 1;
    }
    Ok(Some((len, tok(TokenKind::Literal(Value::Int(n)), &rest[..len], 0))))
}

fn try_regex_or_str(rest: &str, offset: usize) -> Result<Option<(usize, Token)>> {
    if !rest.starts_with('`') {
        return Ok(None);
    }
    let body = &rest[1..];
    let mut end = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '`' => {
                end = Some(i);
                break;
            }
            _ => {}
        }
    }
    match end {
        Some(close) => {
            let text = unescape_backticks(&body[..close]);
            let after = close + 1; // past the closing backtick, within `body`
            let flag_len = body[after..]
                .find(|c: char| !REGEX_FLAG_LETTERS.contains(c))
                .unwrap_or(body[after..].len());
            if flag_len > 0 {
                let flags = RegexFlags::from_letters(&body[after..after + flag_len])?;
                let total = 1 + after + flag_len;
                let value = Value::Regex(std::rc::Rc::new(RegexValue::new(text, flags)?));
                Ok(Some((total, tok(TokenKind::Literal(value), &rest[..total], offset))))
            } else {
                let total = 1 + after;
                Ok(Some((total, tok(TokenKind::Literal(Value::str(text)), &rest[..total], offset))))
            }
        }
        None => {
            // EOF-terminable: the whole remainder becomes a Str.
            let text = unescape_backticks(body);
            Ok(Some((rest.len(), tok(TokenKind::Literal(Value::str(text)), rest, offset))))
        }
    }
}

fn unescape_backticks(s: &str) -> String {
    s.replace("\\`", "`")
}

fn try_chars(rest: &str, offset: usize) -> Result<Option<(usize, Token)>> {
    if !rest.starts_with('\'') {
        return Ok(None);
    }
    let body = &rest[1..];
    let mut chars = body.char_indices();
    let lead_len = match chars.next() {
        Some((_, c)) => c.len_utf8(),
        None => return Err(syntax_error(offset, "expected a character after `'`")),
    };
    let cont = name_continuation_re()
        .find(&body[lead_len..])
        .map(|m| m.end())
        .unwrap_or(0);
    let total = 1 + lead_len + cont;
    let text = body[..lead_len + cont].to_string();
    Ok(Some((total, tok(TokenKind::Literal(Value::str(text)), &rest[..total], offset))))
}
