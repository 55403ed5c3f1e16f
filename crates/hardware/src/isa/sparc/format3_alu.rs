//! Format 3: ALU ops, register-window management, special-register
//! moves, and the `jmpl`/`return` control-transfer pair.
//!
//! Grounded on the teacher's `cpu::stages::execute::alu` (one central
//! `match` over the opcode rather than one handler function per
//! opcode): every binary ALU op decodes into one of two handlers,
//! [`alu_reg`]/[`alu_imm`], which both delegate to [`apply_alu`]. The
//! operand (register or sign-extended immediate) is the only thing that
//! differs between the two decode paths, so the dispatch-time function
//! pointer carries that distinction and the arithmetic itself is
//! written once.

use log::trace;

use crate::core::arch::ccr::Ccr;
use crate::core::error::EmulatorError;
use crate::core::xlate::{Flow, InstrCall};
use crate::sim::Machine;

use super::decode::{
    sign_extend, I_BIT_SHIFT, OP3_MASK, OP3_SHIFT, RD_MASK, RD_SHIFT, RS1_MASK, RS1_SHIFT,
    RS2_MASK, RS2_SHIFT, SIMM13_BITS, SIMM13_MASK,
};

const OP3_ADD: u32 = 0x00;
const OP3_AND: u32 = 0x01;
const OP3_OR: u32 = 0x02;
const OP3_XOR: u32 = 0x03;
const OP3_SUB: u32 = 0x04;
const OP3_ANDN: u32 = 0x05;
const OP3_UDIV: u32 = 0x0E;
const OP3_ADDCC: u32 = 0x10;
const OP3_ANDCC: u32 = 0x11;
const OP3_ORCC: u32 = 0x12;
const OP3_XORCC: u32 = 0x13;
const OP3_SUBCC: u32 = 0x14;
const OP3_ANDNCC: u32 = 0x15;
const OP3_UDIVCC: u32 = 0x1E;
const OP3_SLL: u32 = 0x25;
const OP3_SRL: u32 = 0x26;
const OP3_SRA: u32 = 0x27;
const OP3_RD: u32 = 0x28;
const OP3_RDPR: u32 = 0x29;
const OP3_WR: u32 = 0x30;
const OP3_WRPR: u32 = 0x31;
const OP3_JMPL: u32 = 0x38;
const OP3_RETURN: u32 = 0x39;
const OP3_FLUSH: u32 = 0x3B;
const OP3_SAVE: u32 = 0x3C;
const OP3_RESTORE: u32 = 0x3D;

/// `%o7`, the leaf-return link register `retl` reads from.
const O7: usize = 15;

fn is_imm(word: u32) -> bool {
    (word >> I_BIT_SHIFT) & 1 != 0
}

fn fields(word: u32) -> (u32, u32, u32) {
    let rd = (word >> RD_SHIFT) & RD_MASK;
    let op3 = (word >> OP3_SHIFT) & OP3_MASK;
    let rs1 = (word >> RS1_SHIFT) & RS1_MASK;
    (rd, op3, rs1)
}

fn operand(word: u32) -> i64 {
    if is_imm(word) {
        sign_extend(word & SIMM13_MASK, SIMM13_BITS)
    } else {
        ((word >> RS2_SHIFT) & RS2_MASK) as i64
    }
}

pub fn decode(word: u32) -> Result<InstrCall, EmulatorError> {
    let (rd, op3, rs1) = fields(word);
    match op3 {
        OP3_SAVE => Ok(window_op(rd, rs1, operand(word), is_imm(word), true)),
        OP3_RESTORE => Ok(window_op(rd, rs1, operand(word), is_imm(word), false)),
        OP3_JMPL => Ok(jmpl_op(rd, rs1, operand(word), is_imm(word))),
        OP3_RETURN => Ok(return_op(rs1, operand(word), is_imm(word))),
        OP3_FLUSH => Ok(InstrCall {
            f: flush_handler,
            arg: [0; 3],
        }),
        OP3_RD => Ok(InstrCall {
            f: rd_handler,
            arg: [rd as i64, rs1 as i64, 0],
        }),
        OP3_RDPR => Ok(InstrCall {
            f: rdpr_handler,
            arg: [rd as i64, rs1 as i64, 0],
        }),
        OP3_WR => Ok(wr_op(rd, rs1, operand(word), is_imm(word), false)),
        OP3_WRPR => Ok(wr_op(rd, rs1, operand(word), is_imm(word), true)),
        _ if is_alu_op3(op3) => Ok(alu_op(rd, op3, rs1, operand(word), is_imm(word))),
        _ => Err(EmulatorError::BadOpcode(word)),
    }
}

/// The canonical `retl` encoding (`jmpl %o7 + 8, %g0`) decodes to a
/// plain `jmpl`; this exists only so the decoder's recognition of the
/// encoding is visible in a log trace, not because the semantics differ.
pub fn retl() -> InstrCall {
    trace!("recognized canonical retl encoding");
    jmpl_op(0, O7 as u32, 8, true)
}

fn is_alu_op3(op3: u32) -> bool {
    matches!(
        op3,
        OP3_ADD
            | OP3_AND
            | OP3_OR
            | OP3_XOR
            | OP3_SUB
            | OP3_ANDN
            | OP3_UDIV
            | OP3_ADDCC
            | OP3_ANDCC
            | OP3_ORCC
            | OP3_XORCC
            | OP3_SUBCC
            | OP3_ANDNCC
            | OP3_UDIVCC
            | OP3_SLL
            | OP3_SRL
            | OP3_SRA
    )
}

fn alu_op(rd: u32, op3: u32, rs1: u32, operand: i64, imm: bool) -> InstrCall {
    let packed = ((op3 as i64) << 32) | (operand & 0xFFFF_FFFF);
    InstrCall {
        f: if imm { alu_imm } else { alu_reg },
        arg: [rd as i64, rs1 as i64, packed],
    }
}

fn alu_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    let rd = arg[0] as usize;
    let rs1 = arg[1] as usize;
    let op3 = (arg[2] >> 32) as u32;
    let rs2 = (arg[2] & 0xFFFF_FFFF) as usize;
    let a = machine.cpu.reg(rs1);
    let b = machine.cpu.reg(rs2);
    apply_alu(machine, rd, op3, a, b)
}

fn alu_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    let rd = arg[0] as usize;
    let rs1 = arg[1] as usize;
    let op3 = (arg[2] >> 32) as u32;
    let simm = sign_extend((arg[2] & 0xFFFF_FFFF) as u32, 32);
    let a = machine.cpu.reg(rs1);
    apply_alu(machine, rd, op3, a, simm as u64)
}

/// Computes one binary ALU op and writes it back, setting `icc`/`xcc`
/// for the `*cc` forms. Modeled directly on the teacher's single
/// `match`-based `alu` function rather than one function per opcode.
fn apply_alu(machine: &mut Machine, rd: usize, op3: u32, a: u64, b: u64) -> Result<Flow, EmulatorError> {
    machine.cpu.stats.alu_ops += 1;
    let sets_cc = matches!(
        op3,
        OP3_ADDCC | OP3_ANDCC | OP3_ORCC | OP3_XORCC | OP3_SUBCC | OP3_ANDNCC | OP3_UDIVCC
    );
    let base_op3 = if sets_cc { op3 & !0x10 } else { op3 };

    let result = match base_op3 {
        OP3_ADD => a.wrapping_add(b),
        OP3_AND => a & b,
        OP3_OR => a | b,
        OP3_XOR => a ^ b,
        OP3_SUB => a.wrapping_sub(b),
        OP3_ANDN => a & !b,
        OP3_UDIV => {
            if b == 0 {
                u64::MAX
            } else {
                a.wrapping_div(b)
            }
        }
        OP3_SLL => a.wrapping_shl(b as u32 & 0x3F),
        OP3_SRL => a.wrapping_shr(b as u32 & 0x3F),
        OP3_SRA => ((a as i64) >> (b as u32 & 0x3F)) as u64,
        _ => return Err(EmulatorError::BadOpcode(op3)),
    };

    if sets_cc {
        let mut ccr = Ccr::default();
        match base_op3 {
            OP3_ADD => ccr.set_add(a, b, result),
            OP3_SUB => ccr.set_sub(a, b, result),
            _ => ccr.set_logical(result),
        }
        machine.cpu.ccr = ccr;
    }

    machine.cpu.set_reg(rd, result);
    Ok(Flow::Continue)
}

fn window_op(rd: u32, rs1: u32, operand: i64, imm: bool, is_save: bool) -> InstrCall {
    let packed = operand & 0xFFFF_FFFF;
    let f: fn(&mut Machine, [i64; 3]) -> Result<Flow, EmulatorError> = match (is_save, imm) {
        (true, true) => save_imm,
        (true, false) => save_reg,
        (false, true) => restore_imm,
        (false, false) => restore_reg,
    };
    InstrCall {
        f,
        arg: [rd as i64, rs1 as i64, packed],
    }
}

fn window_operand(machine: &Machine, rs1: usize, packed: i64, imm: bool) -> u64 {
    let a = machine.cpu.reg(rs1);
    let b = if imm {
        sign_extend((packed & 0xFFFF_FFFF) as u32, 32) as u64
    } else {
        machine.cpu.reg((packed & 0xFFFF_FFFF) as usize)
    };
    a.wrapping_add(b)
}

fn save_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    save_common(machine, arg[0] as usize, arg[1] as usize, arg[2], false)
}
fn save_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    save_common(machine, arg[0] as usize, arg[1] as usize, arg[2], true)
}
fn restore_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    restore_common(machine, arg[0] as usize, arg[1] as usize, arg[2], false)
}
fn restore_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    restore_common(machine, arg[0] as usize, arg[1] as usize, arg[2], true)
}

fn save_common(machine: &mut Machine, rd: usize, rs1: usize, packed: i64, imm: bool) -> Result<Flow, EmulatorError> {
    let cpu = &machine.cpu;
    if cpu.cansave <= 0 || cpu.cleanwin - cpu.canrestore <= 0 {
        return Err(EmulatorError::WindowTrap);
    }
    let value = window_operand(machine, rs1, packed, imm);
    machine.cpu.windows.rotate_forward();
    machine.cpu.cansave -= 1;
    machine.cpu.canrestore += 1;
    machine.cpu.set_reg(rd, value);
    machine.cpu.stats.window_saves += 1;
    Ok(Flow::Continue)
}

fn restore_common(machine: &mut Machine, rd: usize, rs1: usize, packed: i64, imm: bool) -> Result<Flow, EmulatorError> {
    if machine.cpu.canrestore <= 0 {
        return Err(EmulatorError::WindowTrap);
    }
    let value = window_operand(machine, rs1, packed, imm);
    machine.cpu.windows.rotate_backward();
    machine.cpu.cansave += 1;
    machine.cpu.canrestore -= 1;
    machine.cpu.set_reg(rd, value);
    machine.cpu.stats.window_restores += 1;
    Ok(Flow::Continue)
}

fn flush_handler(_machine: &mut Machine, _arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    Ok(Flow::Continue)
}

/// Selects which special register `rd`/`rdpr`/`wr`/`wrpr` address. The
/// encoding doesn't pin down the full ancillary-state-register numbering
/// spec.md leaves unspecified beyond `y`/`tick`/`pil`/`pstate`/`tba`; a
/// selector outside that set degrades to `scratch`, consistent with the
/// register-zero redirect convention used elsewhere.
fn special_reg(cpu: &mut crate::core::cpu::Cpu, selector: u32) -> &mut u64 {
    match selector {
        0 => &mut cpu.y,
        6 => &mut cpu.tick,
        _ => &mut cpu.scratch,
    }
}

fn rd_handler(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    let rd = arg[0] as usize;
    let selector = arg[1] as u32;
    let value = *special_reg(&mut machine.cpu, selector);
    machine.cpu.set_reg(rd, value);
    Ok(Flow::Continue)
}

fn rdpr_handler(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    let rd = arg[0] as usize;
    let selector = arg[1] as u32;
    let value = match selector {
        0 => machine.cpu.tick,
        1 => machine.cpu.pil as u64,
        2 => machine.cpu.pstate as u64,
        3 => machine.cpu.tba,
        _ => machine.cpu.scratch,
    };
    machine.cpu.set_reg(rd, value);
    Ok(Flow::Continue)
}

fn wr_op(rd: u32, rs1: u32, operand: i64, imm: bool, is_priv: bool) -> InstrCall {
    let packed = operand & 0xFFFF_FFFF;
    InstrCall {
        f: if is_priv {
            if imm { wrpr_imm } else { wrpr_reg }
        } else if imm {
            wr_imm
        } else {
            wr_reg
        },
        arg: [rd as i64, rs1 as i64, packed],
    }
}

fn wr_source(machine: &Machine, rs1: usize, packed: i64, imm: bool) -> u64 {
    let a = machine.cpu.reg(rs1);
    let b = if imm {
        sign_extend((packed & 0xFFFF_FFFF) as u32, 32) as u64
    } else {
        machine.cpu.reg((packed & 0xFFFF_FFFF) as usize)
    };
    a ^ b
}

fn wr_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    wr_common(machine, arg, false, false)
}
fn wr_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    wr_common(machine, arg, true, false)
}
fn wrpr_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    wr_common(machine, arg, false, true)
}
fn wrpr_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    wr_common(machine, arg, true, true)
}

fn wr_common(machine: &mut Machine, arg: [i64; 3], imm: bool, is_priv: bool) -> Result<Flow, EmulatorError> {
    let selector = arg[0] as u32;
    let rs1 = arg[1] as usize;
    let value = wr_source(machine, rs1, arg[2], imm);
    if is_priv {
        match selector {
            0 => machine.cpu.tick = value,
            1 => machine.cpu.pil = value as u32,
            2 => machine.cpu.pstate = value as u32,
            3 => machine.cpu.tba = value,
            _ => machine.cpu.scratch = value,
        }
    } else {
        *special_reg(&mut machine.cpu, selector) = value;
    }
    Ok(Flow::Continue)
}

fn jmpl_op(rd: u32, rs1: u32, operand: i64, imm: bool) -> InstrCall {
    let packed = operand & 0xFFFF_FFFF;
    InstrCall {
        f: if imm { jmpl_imm } else { jmpl_reg },
        arg: [rd as i64, rs1 as i64, packed],
    }
}

fn jmpl_target(machine: &Machine, rs1: usize, packed: i64, imm: bool) -> u64 {
    let base = machine.cpu.reg(rs1);
    let offset = if imm {
        sign_extend((packed & 0xFFFF_FFFF) as u32, 32) as u64
    } else {
        machine.cpu.reg((packed & 0xFFFF_FFFF) as usize)
    };
    base.wrapping_add(offset)
}

fn jmpl_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    jmpl_common(machine, arg[0] as usize, arg[1] as usize, arg[2], false)
}
fn jmpl_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    jmpl_common(machine, arg[0] as usize, arg[1] as usize, arg[2], true)
}

fn jmpl_common(machine: &mut Machine, rd: usize, rs1: usize, packed: i64, imm: bool) -> Result<Flow, EmulatorError> {
    let target = jmpl_target(machine, rs1, packed, imm);
    let link = machine.cpu.pc;
    machine.cpu.set_reg(rd, link);
    machine.execute_delay_slot()?;
    machine.cpu.pc = target;
    Ok(Flow::Jump(target))
}

fn return_op(rs1: u32, operand: i64, imm: bool) -> InstrCall {
    let packed = operand & 0xFFFF_FFFF;
    InstrCall {
        f: if imm { return_imm } else { return_reg },
        arg: [0, rs1 as i64, packed],
    }
}

fn return_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    return_common(machine, arg[1] as usize, arg[2], false)
}
fn return_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    return_common(machine, arg[1] as usize, arg[2], true)
}

fn return_common(machine: &mut Machine, rs1: usize, packed: i64, imm: bool) -> Result<Flow, EmulatorError> {
    if machine.cpu.canrestore <= 0 {
        return Err(EmulatorError::WindowTrap);
    }
    let target = jmpl_target(machine, rs1, packed, imm);
    machine.execute_delay_slot()?;
    machine.cpu.windows.rotate_backward();
    machine.cpu.cansave += 1;
    machine.cpu.canrestore -= 1;
    machine.cpu.pc = target;
    Ok(Flow::Jump(target))
}
