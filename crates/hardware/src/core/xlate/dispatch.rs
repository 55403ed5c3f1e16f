//! The three sentinel handlers installed into every page.
//!
//! Each is a thin shim satisfying the `HandlerFn` signature; the actual
//! logic lives on `Machine`, which owns the CPU, bus, and page table
//! these handlers need to touch.

use super::instr_call::Flow;
use crate::core::error::EmulatorError;
use crate::sim::Machine;

/// Decodes the guest instruction at `machine.cpu.pc` on first touch,
/// installs the result into the current slot, and re-dispatches it
/// immediately (spec.md §3: "decodes on first touch ... then
/// re-dispatches itself").
pub fn to_be_translated(machine: &mut Machine, _arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    machine.translate_current_slot()
}

/// Normal page-boundary sentinel: advances PC to the next page and
/// signals the dispatch loop to re-resolve there without counting this
/// step as a guest instruction (spec.md §4.5).
pub fn end_of_page(machine: &mut Machine, _arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    Ok(machine.cross_page_boundary())
}

/// Delay-slot-crossing sentinel: reached only when a branch's delay slot
/// physically lives on the next page. Resolves that page, marks
/// `crosspage_delayslot`, and chains into the real instruction at its
/// slot 0 so the delay slot still executes (spec.md §4.6, §9).
pub fn end_of_page2(machine: &mut Machine, _arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    machine.cross_page_boundary_for_delay_slot()
}
