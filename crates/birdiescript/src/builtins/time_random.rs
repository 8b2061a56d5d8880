//! A representative sample of the time/random capability catalogue,
//! grounded on `original_source/birdiescript/builtins.py`'s `####
//! Pseudorandomness functions ####`/`#### Time functions ####` sections.

use crate::context::{Context, Machine};
use crate::error::Result;
use crate::value::{BuiltinDef, Value};

/// `Tn` Now: current time in seconds since the Unix epoch.
fn now(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    machine.push(Value::Float(machine.capabilities.clock.now_unix()));
    Ok(())
}

/// `Ra` Rand/Random: a uniform Float in `[0, 1)`.
fn rand(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    machine.push(Value::Float(machine.capabilities.random.next_f64()));
    Ok(())
}

/// `Rd` Seed: seed the RNG with an Int, or re-seed from entropy if the top
/// of the stack is not an Int.
fn seed(machine: &mut Machine, _ctx: &mut Context) -> Result<()> {
    let top = machine.peek(-1);
    if let Value::Int(n) = top {
        machine.pop();
        let seed = num_traits::ToPrimitive::to_u64(&n).unwrap_or(0);
        machine.capabilities.random.seed(seed);
    } else {
        let reseed = machine.capabilities.clock.now_unix().to_bits();
        machine.capabilities.random.seed(reseed);
    }
    Ok(())
}

pub static ENTRIES: &[BuiltinDef] = &[
    BuiltinDef {
        names: &["Tn", "Now"],
        handler: now,
        doc: "Current time in seconds since the epoch.",
    },
    BuiltinDef {
        names: &["Ra", "Rand", "Random"],
        handler: rand,
        doc: "Choose a random variate uniformly in the interval [0, 1).",
    },
    BuiltinDef {
        names: &["Rd", "Seed"],
        handler: seed,
        doc: "Seed the random number generator with an integer, or from entropy.",
    },
];
