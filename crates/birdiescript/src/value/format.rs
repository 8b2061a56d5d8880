//! Textual form (`Display`) for values, including the shortest-round-trip
//! float formatter the conversion table calls "compact decimal form".

use std::fmt;

use super::{RegexValue, Value};

/// Shortest decimal text that reparses to the same `f64` bits, via the
/// `ryu` crate rather than a generic `{}` formatter (whose output differs
/// from the original interpreter's in whole-valued and exponent edge
/// cases).
pub fn nice_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let mut buf = ryu::Buffer::new();
    let printed = buf.format_finite(f);
    // ryu always emits a form containing `.` or `e`; Birdiescript's own
    // convention marks a whole-valued float with a trailing `.0` rather
    // than ryu's bare `5e0`-style shortest form, so normalize that one
    // case to keep Float and Int textually distinguishable.
    if let Some(stripped) = printed.strip_suffix(".0") {
        format!("{stripped}.0")
    } else {
        printed.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", nice_float(*x)),
            Value::Complex(re, im) => {
                let sign = if *im < 0.0 { "-" } else { "+" };
                write!(f, "({}{}{}j)", nice_float(*re), sign, nice_float(im.abs()))
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Str(s) => write!(f, "{s}"),
            Value::Regex(r) => write!(f, "{r}"),
            Value::Block(b) => write!(f, "{}", b.source_text()),
            Value::Builtin(b) => write!(f, "{}", b.names.first().copied().unwrap_or("?")),
        }
    }
}

impl fmt::Display for RegexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`{}", self.pattern, self.flags.letters())
    }
}
