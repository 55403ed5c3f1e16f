//! CPU architectural state.
//!
//! Grounded on the teacher's `core::cpu::mod.rs` (one struct holding every
//! architectural register, a `new` constructor seeded from `Config`, and
//! an `unsafe impl Send + Sync` for cross-thread handles); the register
//! data itself is grounded directly on spec.md §3 and
//! `original_source/src/cpus/cpu_sparc_instr.cc`.

/// Guest memory access entry point (`memory_rw`).
pub mod memory;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::arch::ccr::Ccr;
use crate::core::arch::window::RegisterWindows;
use crate::core::config::CpuConfig;
use crate::core::error::DelaySlotState;
use crate::core::stats::CpuStats;
use crate::core::xlate::page::PageRef;

/// SPARC v8/v9 CPU architectural state.
///
/// Holds exactly the state spec.md §3 names: the windowed register file,
/// condition codes, the special registers, the register-window spill/
/// fill counters, the delay-slot state machine, and the translation
/// cache's dispatch cursor (`cur_ic_page`/`next_ic`).
pub struct Cpu {
    /// Logical register file (globals + windowed outs/locals).
    pub windows: RegisterWindows,
    /// Condition-code register (`icc`/`xcc`).
    pub ccr: Ccr,
    /// Multiply/divide remainder register.
    pub y: u64,
    /// Trap base address.
    pub tba: u64,
    /// Version register.
    pub ver: u64,
    /// Processor interrupt level.
    pub pil: u32,
    /// Processor state register.
    pub pstate: u32,
    /// Tick counter.
    pub tick: u64,
    /// Tick compare register.
    pub tick_cmpr: u64,
    /// Floating-point register state register.
    pub fprs: u32,
    /// Windows available to `save`.
    pub cansave: i32,
    /// Windows available to `restore`.
    pub canrestore: i32,
    /// Windows that need not be saved on a trap.
    pub cleanwin: i32,
    /// Sink for writes redirected from `%g0` and from any opcode that
    /// the decoder degrades to a side-effect-free form (spec.md §3's
    /// register-zero convention).
    pub scratch: u64,
    /// Program counter.
    pub pc: u64,
    /// Trap level: 0 when not trapped, incremented on trap entry (spec.md
    /// §9's "vector through `tba`/trap-level state").
    pub tl: u32,
    /// PC saved by the most recent `enter_trap`, for a trap handler to
    /// resume from.
    pub tpc: u64,
    /// Delay-slot state machine.
    pub delay_slot: DelaySlotState,
    /// Set when a branch's delay slot instruction physically lives on
    /// the page after the branch (spec.md §4.6, §9's resolved open
    /// question).
    pub crosspage_delayslot: bool,
    /// 32-bit (v8) vs. 64-bit (v9) operating mode.
    pub is_32bit: bool,
    /// Count of guest instructions dispatched (page sentinels excluded).
    pub n_translated_instrs: u64,
    /// The translation cache page the dispatch loop is currently
    /// stepping through.
    pub cur_ic_page: Option<PageRef>,
    /// Index of the next slot to dispatch within `cur_ic_page`.
    pub next_ic: usize,
    /// Cooperative cancellation flag, polled once per dispatched
    /// instruction (spec.md §5).
    pub stop_requested: Arc<AtomicBool>,
    /// Ambient instruction-mix counters.
    pub stats: CpuStats,
}

// A CPU handle may be polled for `stop_requested` from another thread
// (e.g. a UI loop) between instructions; the CPU itself never runs
// concurrently with that poll, matching the teacher's rationale for its
// own `unsafe impl Send + Sync` on `Cpu`.
unsafe impl Send for Cpu {}
unsafe impl Sync for Cpu {}

impl Cpu {
    /// Builds a fresh CPU from a `sparc_cpu` component's configuration,
    /// with the program counter set to `start_pc`.
    pub fn new(config: &CpuConfig, start_pc: u64) -> Self {
        Self {
            windows: RegisterWindows::new(config.nwindows),
            ccr: Ccr::default(),
            y: 0,
            tba: 0,
            ver: 0,
            pil: 0,
            pstate: 0,
            tick: 0,
            tick_cmpr: 0,
            fprs: 0,
            cansave: config.nwindows as i32 - 1,
            canrestore: 0,
            cleanwin: config.nwindows as i32 - 1,
            scratch: 0,
            pc: start_pc,
            tl: 0,
            tpc: 0,
            delay_slot: DelaySlotState::NotDelayed,
            crosspage_delayslot: false,
            is_32bit: config.is_32bit,
            n_translated_instrs: 0,
            cur_ic_page: None,
            next_ic: 0,
            stop_requested: Arc::new(AtomicBool::new(false)),
            stats: CpuStats::default(),
        }
    }

    /// Reads logical register `index` (0..=31). `%g0` always reads zero,
    /// regardless of what has been written to `scratch`.
    pub fn reg(&self, index: usize) -> u64 {
        if index == 0 {
            0
        } else {
            self.windows.read(index)
        }
    }

    /// Writes logical register `index`, redirecting `%g0` to `scratch`
    /// (spec.md §3's register-zero convention).
    pub fn set_reg(&mut self, index: usize, value: u64) {
        if index == 0 {
            self.scratch = value;
        } else {
            self.windows.write(index, value);
        }
    }

    /// Whether the cooperative stop flag has been raised.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Relaxed)
    }

    /// Synthesizes a trap entry: saves `pc`, raises the trap level, and
    /// vectors `pc` into the trap table at `tba + trap_type * 0x20` (spec.md
    /// §9's resolution of the exemplar's "window spill/fill traps ...
    /// abort" shortcut — this CPU vectors through `tba`/trap-level state
    /// instead of aborting).
    pub fn enter_trap(&mut self, trap_type: u8) {
        self.tpc = self.pc;
        self.tl += 1;
        self.pc = self.tba.wrapping_add((trap_type as u64) << 5);
    }
}
