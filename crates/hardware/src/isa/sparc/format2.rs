//! Format 2: conditional branches and `sethi`.

use crate::core::error::EmulatorError;
use crate::core::xlate::{Flow, InstrCall};
use crate::sim::Machine;

use super::cond;
use super::decode::{
    sign_extend, ANNUL_BIT, COND_MASK, DISP22_BITS, DISP22_MASK, OP2_MASK, OP2_SETHI, OP2_SHIFT,
    RD_MASK, RD_SHIFT,
};

/// Bit shift to the 2-bit `cc` field selecting `icc` vs `xcc` (`Bicc`
/// ignores it and always reads `icc`; kept here for the `BPcc` case).
const CC_SHIFT: u32 = 20;
const CC_MASK: u32 = 0x3;
const CC_XCC: u32 = 0b10;

pub fn decode(word: u32) -> Result<InstrCall, EmulatorError> {
    let op2 = (word >> OP2_SHIFT) & OP2_MASK;
    if op2 == OP2_SETHI {
        return Ok(decode_sethi(word));
    }
    Ok(decode_branch(word))
}

fn decode_sethi(word: u32) -> InstrCall {
    let rd = (word >> RD_SHIFT) & RD_MASK;
    let imm22 = word & DISP22_MASK;
    let value = (imm22 as u64) << 10;
    InstrCall {
        f: sethi_handler,
        arg: [rd as i64, value as i64, 0],
    }
}

fn sethi_handler(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    machine.cpu.set_reg(arg[0] as usize, arg[1] as u64);
    Ok(Flow::Continue)
}

fn decode_branch(word: u32) -> InstrCall {
    let rd_field = (word >> RD_SHIFT) & RD_MASK;
    let annul = (rd_field >> ANNUL_BIT) & 1 != 0;
    let cond = rd_field & COND_MASK;
    let use_xcc = ((word >> CC_SHIFT) & CC_MASK) == CC_XCC;
    let disp22 = word & DISP22_MASK;
    let disp = sign_extend(disp22, DISP22_BITS) << 2;

    let mut flags_word = cond as i64;
    if annul {
        flags_word |= 1 << 8;
    }
    if use_xcc {
        flags_word |= 1 << 9;
    }
    InstrCall {
        f: branch_handler,
        arg: [flags_word, disp, 0],
    }
}

fn branch_handler(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    let flags_word = arg[0];
    let cond_field = (flags_word & 0xF) as u32;
    let annul = flags_word & (1 << 8) != 0;
    let use_xcc = flags_word & (1 << 9) != 0;
    let disp = arg[1];

    let ccr = machine.cpu.ccr;
    let flags = if use_xcc { ccr.xcc } else { ccr.icc };
    let is_taken = cond::taken(cond_field, &flags);

    if is_taken {
        machine.cpu.stats.branches_taken += 1;
        let branch_pc = machine.cpu.pc;
        let target = branch_pc.wrapping_add(disp as u64);
        machine.execute_delay_slot()?;
        machine.cpu.pc = target;
        Ok(Flow::Jump(target))
    } else {
        machine.cpu.stats.branches_not_taken += 1;
        if annul {
            machine.cpu.stats.branches_annulled += 1;
            let skip_pc = machine.cpu.pc.wrapping_add(8);
            Ok(Flow::Jump(skip_pc))
        } else {
            machine.execute_delay_slot()?;
            let fall_through = machine.cpu.pc.wrapping_add(8);
            Ok(Flow::Jump(fall_through))
        }
    }
}
