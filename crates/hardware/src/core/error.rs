//! Error taxonomy for decode, dispatch, and structural failures.
//!
//! Grounded on the teacher's `common::error` (an enum of architectural
//! faults implementing `Display`/`Error`) and the pack's convention of
//! `thiserror`-derived wrapper errors at crate boundaries. One variant per
//! fault class.

use crate::common::AccessHint;

/// A fault raised by decode, dispatch, or a tree-structural operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmulatorError {
    /// An instruction word didn't match any known SPARC encoding.
    #[error("unknown opcode encoding: {0:#010x}")]
    BadOpcode(u32),
    /// A memory access (fetch or data) failed at the given address.
    #[error("memory fault at {addr:#018x} ({hint:?})")]
    MemoryFault {
        /// The guest address the access targeted.
        addr: u64,
        /// Whether the failing access was an instruction fetch or data
        /// access.
        hint: AccessHint,
    },
    /// `save`, `restore`, or `flushw` hit a window spill/fill condition.
    #[error("register window spill/fill trap")]
    WindowTrap,
    /// A structural component-tree operation was rejected (duplicate
    /// parent, malformed spec).
    #[error("structural error: {0}")]
    Structural(&'static str),
    /// `ComponentFactory::create` was given an unregistered class name.
    #[error("no such component class: {0}")]
    FactoryMiss(String),
    /// `Component::lookup_path` found no component at the given path.
    #[error("no component at path: {0}")]
    PathMiss(String),
}

/// The delay-slot state machine of spec §4.6/§4.5, with the
/// `EXCEPTION_IN_DELAY_SLOT` flag folded into its own variant rather than
/// a separate boolean — an illegal combination (delayed *and* excepted
/// without ever being delayed) is simply not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelaySlotState {
    /// No branch is in flight.
    #[default]
    NotDelayed,
    /// A branch/call/jump just ran; the next dispatched instruction is its
    /// delay slot.
    ToBeDelayed,
    /// The delay slot raised an exception; the branch's PC update is
    /// suppressed and the trap path runs instead.
    ExceptionInDelaySlot,
}
