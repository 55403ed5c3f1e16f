//! Property 4: the decoded `addcc`/`subcc` handlers agree with an
//! independent 32-bit reference model on the result register and on
//! `icc`'s N/Z/V, across arbitrary operands.

use proptest::prelude::*;
use sparc_core::core::config::MachineConfig;
use sparc_core::Machine;

/// `addcc %g1, simm13, %g2` (rd=2, op3=`0x10`, rs1=1, i=1).
fn addcc_imm(simm13: i32) -> u32 {
    alu_imm_word(2, 0x10, 1, simm13)
}

/// `subcc %g1, simm13, %g2` (rd=2, op3=`0x14`, rs1=1, i=1).
fn subcc_imm(simm13: i32) -> u32 {
    alu_imm_word(2, 0x14, 1, simm13)
}

fn alu_imm_word(rd: u32, op3: u32, rs1: u32, simm13: i32) -> u32 {
    let simm13_field = (simm13 as u32) & 0x1FFF;
    (0b10 << 30) | (rd << 25) | (op3 << 19) | (rs1 << 14) | (1 << 13) | simm13_field
}

fn run_alu_word(word: u32, reg1: i32) -> (u32, bool, bool, bool) {
    let config = MachineConfig::default();
    let mut machine = Machine::new(&config);
    let mut image = Vec::new();
    image.extend_from_slice(&word.to_be_bytes());
    machine.load_image(&image);
    machine.cpu.set_reg(1, (reg1 as i64) as u64);

    machine.step().expect("well-formed ALU instruction");

    let result32 = machine.cpu.reg(2) as u32;
    let icc = machine.cpu.ccr.icc;
    (result32, icc.n, icc.z, icc.v)
}

proptest! {
    #[test]
    fn addcc_agrees_with_an_independent_32_bit_reference(
        a in any::<i32>(),
        b in -4096i32..=4095,
    ) {
        let (result, n, z, v) = run_alu_word(addcc_imm(b), a);

        let (expected, overflow) = a.overflowing_add(b);
        prop_assert_eq!(result, expected as u32);
        prop_assert_eq!(n, expected < 0);
        prop_assert_eq!(z, expected == 0);
        prop_assert_eq!(v, overflow);
    }

    #[test]
    fn subcc_agrees_with_an_independent_32_bit_reference(
        a in any::<i32>(),
        b in -4096i32..=4095,
    ) {
        let (result, n, z, v) = run_alu_word(subcc_imm(b), a);

        let (expected, overflow) = a.overflowing_sub(b);
        prop_assert_eq!(result, expected as u32);
        prop_assert_eq!(n, expected < 0);
        prop_assert_eq!(z, expected == 0);
        prop_assert_eq!(v, overflow);
    }
}
