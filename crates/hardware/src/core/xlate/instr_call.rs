//! `InstrCall`: a pre-bound, dispatchable translation-cache slot.
//!
//! Grounded on spec.md §3/§9: "a record of (handler, arg0, arg1, arg2)
//! pre-bound at decode time and dispatched by calling the handler." This
//! implementation represents the handler as a plain Rust function
//! pointer rather than an enum+switch, per spec.md §9's note that either
//! representation is acceptable and the test suite must not depend on
//! which one is chosen.

use crate::core::error::EmulatorError;
use crate::sim::Machine;

/// What a handler tells the dispatch loop to do with `cpu.pc` / the
/// dispatch cursor after it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Fall through to the next slot in the same page (the common case).
    Continue,
    /// Control transferred; re-resolve the translation cache at the new
    /// PC (already written into `cpu.pc` by the handler).
    Jump(u64),
    /// A page-sentinel fired; re-resolve at the new PC, but do not count
    /// this dispatch toward `n_translated_instrs` (spec.md §4.5).
    PageBoundary(u64),
}

/// A handler function: decode-time-bound behavior for one guest
/// instruction slot.
pub type HandlerFn = fn(&mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError>;

/// A single translation-cache slot.
#[derive(Clone)]
pub struct InstrCall {
    /// The handler to invoke.
    pub f: HandlerFn,
    /// Up to three architecture-word-sized arguments, pre-extracted at
    /// decode time.
    pub arg: [i64; 3],
}

impl InstrCall {
    /// The sentinel every slot holds before its guest instruction has
    /// been decoded (spec.md §3/§4.5): decodes on first touch and
    /// re-dispatches itself.
    pub fn to_be_translated() -> Self {
        InstrCall {
            f: super::dispatch::to_be_translated,
            arg: [0; 3],
        }
    }
}
