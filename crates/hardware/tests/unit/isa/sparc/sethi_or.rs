//! `sethi %hi(0x400), %g1` then `or %g1, 1, %g1` builds `%g1 = 0x401`.

use crate::common::{machine_with_program, step_n};

const SETHI_HI_0X400_G1: u32 = 0x0300_0001;
const OR_G1_1_G1: u32 = 0x8210_6001;

#[test]
fn sethi_then_or_builds_the_expected_immediate() {
    let mut machine = machine_with_program(&[SETHI_HI_0X400_G1, OR_G1_1_G1]);
    let start_pc = machine.cpu.pc;

    step_n(&mut machine, 2);

    assert_eq!(machine.cpu.reg(1), 0x401);
    assert_eq!(machine.cpu.pc, start_pc + 8);
}

/// `sethi` alone loads only the high 22 bits; the low 10 bits are zero
/// until something ORs them in.
#[test]
fn sethi_alone_leaves_low_bits_clear() {
    let mut machine = machine_with_program(&[SETHI_HI_0X400_G1]);
    step_n(&mut machine, 1);
    assert_eq!(machine.cpu.reg(1), 0x400);
}
