//! Regex values: a compiled pattern plus a flag mask that merges under
//! union-with-supersession.

use crate::error::{Error, Result};

/// One bit per recognized flag letter (`abfilmersuvwx`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct RegexFlags(u16);

const FLAG_LETTERS: &str = "abfilmersuvwx";

impl RegexFlags {
    pub fn empty() -> Self {
        RegexFlags(0)
    }

    pub fn from_letters(letters: &str) -> Result<Self> {
        let mut bits = 0u16;
        for c in letters.chars() {
            let idx = FLAG_LETTERS.find(c).ok_or_else(|| Error::Value {
                message: format!("unknown regex flag `{c}`"),
            })?;
            bits |= 1 << idx;
        }
        Ok(RegexFlags(bits))
    }

    pub fn has(self, letter: char) -> bool {
        match FLAG_LETTERS.find(letter) {
            Some(idx) => self.0 & (1 << idx) != 0,
            None => false,
        }
    }

    fn without(self, letter: char) -> Self {
        let idx = FLAG_LETTERS.find(letter).expect("known flag letter");
        RegexFlags(self.0 & !(1 << idx))
    }

    /// Union two flag sets, then drop the legacy `a` (ascii) / `l` (locale)
    /// markers when `u` (unicode) is present in the result, since unicode
    /// mode supersedes and disables those older, narrower flags.
    pub fn merge(self, other: Self) -> Self {
        let mut merged = RegexFlags(self.0 | other.0);
        if merged.has('u') {
            merged = merged.without('a').without('l');
        }
        merged
    }

    pub fn letters(self) -> String {
        FLAG_LETTERS
            .chars()
            .filter(|c| self.has(*c))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RegexValue {
    pub pattern: String,
    pub flags: RegexFlags,
    pub compiled: regex::Regex,
}

impl RegexValue {
    pub fn new(pattern: impl Into<String>, flags: RegexFlags) -> Result<Self> {
        let pattern = pattern.into();
        let mut builder_pattern = pattern.clone();
        if flags.has('i') {
            builder_pattern = format!("(?i){builder_pattern}");
        }
        if flags.has('m') {
            builder_pattern = format!("(?m){builder_pattern}");
        }
        if flags.has('s') {
            builder_pattern = format!("(?s){builder_pattern}");
        }
        if flags.has('x') {
            builder_pattern = format!("(?x){builder_pattern}");
        }
        let compiled = regex::Regex::new(&builder_pattern).map_err(|e| Error::Value {
            message: format!("invalid regex `{pattern}`: {e}"),
        })?;
        Ok(RegexValue {
            pattern,
            flags,
            compiled,
        })
    }

    pub fn merge(&self, other: &RegexValue) -> Result<Self> {
        RegexValue::new(
            format!("{}{}", self.pattern, other.pattern),
            self.flags.merge(other.flags),
        )
    }

    pub fn repeated(&self, n: usize) -> Result<Self> {
        RegexValue::new(self.pattern.repeat(n), self.flags)
    }
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}
