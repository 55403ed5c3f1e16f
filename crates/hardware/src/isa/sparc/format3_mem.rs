//! Format 3: loads and stores.

use crate::common::AccessDirection;
use crate::core::error::EmulatorError;
use crate::core::xlate::{Flow, InstrCall};
use crate::sim::Machine;

use super::decode::{
    sign_extend, I_BIT_SHIFT, OP3_MASK, OP3_SHIFT, RD_MASK, RD_SHIFT, RS1_MASK, RS1_SHIFT,
    RS2_MASK, RS2_SHIFT, SIMM13_BITS, SIMM13_MASK,
};

const OP3_LDUW: u32 = 0x00;
const OP3_LDUB: u32 = 0x01;
const OP3_LDUH: u32 = 0x02;
const OP3_ST: u32 = 0x04;
const OP3_STB: u32 = 0x05;
const OP3_STH: u32 = 0x06;
const OP3_LDSW: u32 = 0x08;
const OP3_LDSB: u32 = 0x09;
const OP3_LDSH: u32 = 0x0A;
const OP3_LDX: u32 = 0x0B;
const OP3_STX: u32 = 0x0E;

fn is_imm(word: u32) -> bool {
    (word >> I_BIT_SHIFT) & 1 != 0
}

fn operand(word: u32) -> i64 {
    if is_imm(word) {
        sign_extend(word & SIMM13_MASK, SIMM13_BITS)
    } else {
        ((word >> RS2_SHIFT) & RS2_MASK) as i64
    }
}

/// `(size_in_bytes, sign_extend_on_load)` for a load/store `op3`.
fn shape(op3: u32) -> Option<(u32, bool)> {
    match op3 {
        OP3_LDUW | OP3_ST => Some((4, false)),
        OP3_LDUB | OP3_STB => Some((1, false)),
        OP3_LDUH | OP3_STH => Some((2, false)),
        OP3_LDSW => Some((4, true)),
        OP3_LDSB => Some((1, true)),
        OP3_LDSH => Some((2, true)),
        OP3_LDX | OP3_STX => Some((8, false)),
        _ => None,
    }
}

fn is_store(op3: u32) -> bool {
    matches!(op3, OP3_ST | OP3_STB | OP3_STH | OP3_STX)
}

pub fn decode(word: u32) -> Result<InstrCall, EmulatorError> {
    let rd = (word >> RD_SHIFT) & RD_MASK;
    let op3 = (word >> OP3_SHIFT) & OP3_MASK;
    let rs1 = (word >> RS1_SHIFT) & RS1_MASK;
    let (size, signed) = shape(op3).ok_or(EmulatorError::BadOpcode(word))?;
    let imm = is_imm(word);
    let packed_meta = ((size as i64) << 8) | (signed as i64);

    if is_store(op3) {
        let f = if imm { store_imm } else { store_reg };
        Ok(InstrCall {
            f,
            arg: [rd as i64, rs1 as i64, (operand(word) << 16) | packed_meta],
        })
    } else {
        let f = if imm { load_imm } else { load_reg };
        Ok(InstrCall {
            f,
            arg: [rd as i64, rs1 as i64, (operand(word) << 16) | packed_meta],
        })
    }
}

fn unpack(packed: i64) -> (i64, u32, bool) {
    let operand = packed >> 16;
    let meta = packed & 0xFFFF;
    let size = (meta >> 8) as u32;
    let signed = (meta & 1) != 0;
    (operand, size, signed)
}

fn effective_addr(machine: &Machine, rs1: usize, operand: i64, is_reg_operand: bool) -> u64 {
    let base = machine.cpu.reg(rs1);
    let off = if is_reg_operand {
        machine.cpu.reg(operand as usize)
    } else {
        operand as u64
    };
    base.wrapping_add(off)
}

fn load_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    load_common(machine, arg, true)
}
fn load_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    load_common(machine, arg, false)
}

fn load_common(machine: &mut Machine, arg: [i64; 3], reg_operand: bool) -> Result<Flow, EmulatorError> {
    let rd = arg[0] as usize;
    let rs1 = arg[1] as usize;
    let (operand, size, signed) = unpack(arg[2]);
    let addr = effective_addr(machine, rs1, operand, reg_operand);

    let mut buf = [0u8; 8];
    machine.data_access(addr, &mut buf[..size as usize], AccessDirection::Read)?;

    let raw: u64 = match size {
        1 => buf[0] as u64,
        2 => u16::from_be_bytes([buf[0], buf[1]]) as u64,
        4 => u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as u64,
        8 => u64::from_be_bytes(buf),
        _ => unreachable!("load size is one of 1/2/4/8"),
    };
    let value = if signed {
        let bits = size * 8;
        sign_extend(raw as u32, bits.min(32)) as u64
    } else {
        raw
    };
    machine.cpu.set_reg(rd, value);
    machine.cpu.stats.loads += 1;
    Ok(Flow::Continue)
}

fn store_reg(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    store_common(machine, arg, true)
}
fn store_imm(machine: &mut Machine, arg: [i64; 3]) -> Result<Flow, EmulatorError> {
    store_common(machine, arg, false)
}

fn store_common(machine: &mut Machine, arg: [i64; 3], reg_operand: bool) -> Result<Flow, EmulatorError> {
    let rd = arg[0] as usize;
    let rs1 = arg[1] as usize;
    let (operand, size, _signed) = unpack(arg[2]);
    let addr = effective_addr(machine, rs1, operand, reg_operand);
    let value = machine.cpu.reg(rd);

    let bytes = value.to_be_bytes();
    let start = 8 - size as usize;
    let mut payload = bytes[start..].to_vec();
    machine.data_access(addr, &mut payload, AccessDirection::Write)?;
    machine.invalidate_page(addr);
    machine.cpu.stats.stores += 1;
    Ok(Flow::Continue)
}
