//! The instruction word decoder: turns a 32-bit guest instruction into a
//! pre-bound [`InstrCall`].
//!
//! Grounded on the teacher's `isa::decode` (bitfield extraction via named
//! shift/mask constants, one group of constants per instruction format).
//! SPARC has four primary formats selected by the top 2 bits (`op`)
//! rather than RISC-V's six; `format1`/`format2`/`format3_alu`/
//! `format3_mem` mirror the teacher's per-family opcode modules.

use crate::core::error::EmulatorError;
use crate::core::xlate::InstrCall;

use super::{format1, format2, format3_alu, format3_mem};

/// Bit shift to the primary 2-bit opcode field.
const OP_SHIFT: u32 = 30;
const OP_MASK: u32 = 0x3;

/// Format 2: conditional branches, `sethi`.
const OP_FORMAT2: u32 = 0b00;
/// Format 1: `call`.
const OP_FORMAT1: u32 = 0b01;
/// Format 3: ALU/window/special-register ops.
const OP_FORMAT3_ALU: u32 = 0b10;
/// Format 3: loads/stores.
const OP_FORMAT3_MEM: u32 = 0b11;

/// Bit shift to the 5-bit destination register field (`rd`).
pub const RD_SHIFT: u32 = 25;
pub const RD_MASK: u32 = 0x1F;

/// Bit shift to the 6-bit `op3` field (format 3 only).
pub const OP3_SHIFT: u32 = 19;
pub const OP3_MASK: u32 = 0x3F;

/// Bit shift to the 5-bit `rs1` field.
pub const RS1_SHIFT: u32 = 14;
pub const RS1_MASK: u32 = 0x1F;

/// Bit position of the immediate-select bit (format 3).
pub const I_BIT_SHIFT: u32 = 13;

/// Bit shift to the 5-bit `rs2` field (register form).
pub const RS2_SHIFT: u32 = 0;
pub const RS2_MASK: u32 = 0x1F;

/// Width, in bits, of the `simm13` immediate field.
pub const SIMM13_BITS: u32 = 13;
pub const SIMM13_MASK: u32 = (1 << SIMM13_BITS) - 1;

/// Bit shift to the 3-bit `op2` field (format 2 only).
pub const OP2_SHIFT: u32 = 22;
pub const OP2_MASK: u32 = 0x7;
/// `op2` value identifying `sethi`.
pub const OP2_SETHI: u32 = 0b100;

/// Bit position of the branch annul flag within `rd` (format 2).
pub const ANNUL_BIT: u32 = 4;
/// Bit width of the `cond` field within `rd` (format 2), once the annul
/// bit is masked off.
pub const COND_MASK: u32 = 0xF;

/// Width, in bits, of the `disp22` branch displacement field.
pub const DISP22_BITS: u32 = 22;
pub const DISP22_MASK: u32 = (1 << DISP22_BITS) - 1;

/// Width, in bits, of the `disp30` `call` displacement field.
pub const DISP30_BITS: u32 = 30;
pub const DISP30_MASK: u32 = (1 << DISP30_BITS) - 1;

/// The canonical `retl` encoding (`jmpl %o7 + 8, %g0`), recognised so a
/// leaf-return-specific handler can be substituted (spec.md §4.6).
pub const RETL_ENCODING: u32 = 0x81c3_e008;

/// Sign-extends the low `bits` bits of `value`.
pub fn sign_extend(value: u32, bits: u32) -> i64 {
    let shift = 32 - bits;
    ((value << shift) as i32 >> shift) as i64
}

/// Decodes `word` into a pre-bound [`InstrCall`]. `is_32bit` currently
/// only affects which handler variants are legal to select in practice;
/// decoding itself is width-independent (spec.md §4.6's instruction word
/// layout is the same for v8 and v9).
pub fn decode_one(word: u32, is_32bit: bool) -> Result<InstrCall, EmulatorError> {
    let _ = is_32bit;
    if word == RETL_ENCODING {
        return Ok(format3_alu::retl());
    }

    let op = (word >> OP_SHIFT) & OP_MASK;
    match op {
        OP_FORMAT2 => format2::decode(word),
        OP_FORMAT1 => Ok(format1::decode(word)),
        OP_FORMAT3_ALU => format3_alu::decode(word),
        OP_FORMAT3_MEM => format3_mem::decode(word),
        _ => unreachable!("op is masked to 2 bits"),
    }
}
