//! The process-wide builtins table: a flat name→`BuiltinDef` lookup using
//! static-table registration rather than a runtime-populated `HashMap`
//! built at startup — every
//! entry is a `const`, so `lookup` only has to linear-scan a handful of
//! `'static` category slices.
//!
//! Registers a representative catalogue of built-in names rather than
//! porting every entry `original_source/birdiescript/builtins.py` defines:
//! stack shuffling, conversions, the operator table, control flow, and a
//! sample of the I/O/time/random/math catalogue. Each category lives in
//! its own module, matching how the original source itself splits
//! `builtins.py` into commented `####` sections.

mod control_ops;
mod conversions;
mod io_ops;
mod math_ops;
mod operators;
mod stack_ops;
mod time_random;

use crate::value::BuiltinDef;

/// One registered entry per category module's `ENTRIES` constant, scanned
/// in turn by `lookup`.
pub struct BuiltinTable {
    categories: &'static [&'static [BuiltinDef]],
}

impl BuiltinTable {
    pub fn lookup(&self, name: &str) -> Option<&'static BuiltinDef> {
        self.categories
            .iter()
            .find_map(|entries| entries.iter().find(|def| def.names.contains(&name)))
    }

    /// Every registered definition, category by category. Exposed for
    /// embedders that want to print a built-in reference rather than look
    /// up one name at a time.
    pub fn all(&self) -> impl Iterator<Item = &'static BuiltinDef> {
        self.categories.iter().flat_map(|entries| entries.iter())
    }
}

/// The single process-wide table. Built once from every category module's
/// `ENTRIES` constant.
pub static TABLE: BuiltinTable = BuiltinTable {
    categories: &[
        stack_ops::ENTRIES,
        conversions::ENTRIES,
        operators::ENTRIES,
        control_ops::ENTRIES,
        io_ops::ENTRIES,
        time_random::ENTRIES,
        math_ops::ENTRIES,
    ],
};
