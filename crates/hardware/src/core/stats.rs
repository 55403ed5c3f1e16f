//! Per-run instruction-mix counters.
//!
//! Grounded on the teacher's `stats::SimStats` (plain counters updated
//! from the retire path, with a `Display` impl for end-of-run reporting).
//! Ambient observability only — spec.md's exemplar has no counterpart to
//! this beyond `n_translated_instrs`, which stays on `Cpu` itself since
//! the dispatch loop depends on it architecturally (page-sentinel
//! accounting); everything here is purely descriptive.

use std::fmt;

/// Counters updated once per retired instruction by the dispatch loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuStats {
    /// Loads executed.
    pub loads: u64,
    /// Stores executed.
    pub stores: u64,
    /// Conditional branches taken.
    pub branches_taken: u64,
    /// Conditional branches not taken.
    pub branches_not_taken: u64,
    /// Annulled branches whose delay slot was skipped.
    pub branches_annulled: u64,
    /// `call` instructions executed.
    pub calls: u64,
    /// ALU (format-3 non-memory) instructions executed.
    pub alu_ops: u64,
    /// `save` instructions executed.
    pub window_saves: u64,
    /// `restore` instructions executed.
    pub window_restores: u64,
}

impl fmt::Display for CpuStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loads={} stores={} branches(taken={} not_taken={} annulled={}) \
             calls={} alu={} window(saves={} restores={})",
            self.loads,
            self.stores,
            self.branches_taken,
            self.branches_not_taken,
            self.branches_annulled,
            self.calls,
            self.alu_ops,
            self.window_saves,
            self.window_restores,
        )
    }
}
