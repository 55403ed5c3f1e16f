//! Format 1: `call`.

use crate::core::error::EmulatorError;
use crate::core::xlate::{Flow, InstrCall};
use crate::sim::Machine;

use super::decode::{sign_extend, DISP30_BITS, DISP30_MASK};

/// The logical register index of `%o7`, where `call` stashes its return
/// address.
const O7: usize = 15;

/// Decodes a `call` instruction: `disp30`, sign-extended and left-shifted
/// by 2, added to the call site's PC.
pub fn decode(word: u32) -> InstrCall {
    let disp30 = word & DISP30_MASK;
    let disp = sign_extend(disp30, DISP30_BITS) << 2;
    InstrCall {
        f: call_handler,
        arg: [disp, 0, 0],
    }
}

fn call_handler(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    let call_pc = machine.cpu.pc;
    let target = call_pc.wrapping_add(arg[0] as u64);
    machine.cpu.set_reg(O7, call_pc);
    machine.cpu.stats.calls += 1;
    machine.execute_delay_slot()?;
    machine.cpu.pc = target;
    Ok(Flow::Jump(target))
}
