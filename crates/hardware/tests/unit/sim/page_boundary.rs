//! Execution crossing from one translated page into the next, both in
//! ordinary sequential flow and through a branch's delay slot.

use crate::common::{machine_with_program, step_n};
use sparc_core::core::config::MachineConfig;
use sparc_core::core::xlate::page::PAGE_SIZE_BYTES;
use sparc_core::Machine;

const NOP: u32 = 0x0100_0000; // sethi 0, %g0
const SETHI_HI_0X400_G1: u32 = 0x0300_0001; // sethi %hi(0x400), %g1
const OR_G1_1_G1: u32 = 0x8210_6001; // or %g1, 1, %g1
/// `ba .+8`: cond=8 (always), annul=0, `disp22=2`.
const BA_PLUS_8: u32 = 0x1080_0002;

#[test]
fn ordinary_fallthrough_resolves_into_the_next_page() {
    let last_slot = (PAGE_SIZE_BYTES / 4) as usize - 1;
    let mut words = vec![NOP; last_slot + 2];
    words[last_slot] = NOP;
    words[last_slot + 1] = SETHI_HI_0X400_G1;

    let mut machine = machine_with_program(&words);
    machine.cpu.pc = (last_slot as u64) * 4;

    step_n(&mut machine, 1); // the last instruction on page 0
    assert_eq!(machine.cpu.pc, PAGE_SIZE_BYTES);

    step_n(&mut machine, 1); // resolves onto page 1 and decodes there
    assert_eq!(machine.cpu.reg(1), 0x400);
    assert_eq!(machine.cpu.pc, PAGE_SIZE_BYTES + 4);
    assert_eq!(machine.cpu.n_translated_instrs, 2);
}

#[test]
fn a_branch_delay_slot_that_lives_on_the_next_page_still_executes() {
    let config = MachineConfig::default();
    let mut machine = Machine::new(&config);

    let mut image = vec![0u8; (PAGE_SIZE_BYTES as usize) + 8];
    let branch_pc = PAGE_SIZE_BYTES - 4;
    image[branch_pc as usize..branch_pc as usize + 4].copy_from_slice(&BA_PLUS_8.to_be_bytes());
    image[PAGE_SIZE_BYTES as usize..PAGE_SIZE_BYTES as usize + 4]
        .copy_from_slice(&OR_G1_1_G1.to_be_bytes());
    machine.load_image(&image);
    machine.cpu.pc = branch_pc;

    step_n(&mut machine, 1);

    assert_eq!(machine.cpu.pc, branch_pc + 8, "branch target overwrites pc regardless of the cross-page fetch");
    assert_eq!(machine.cpu.reg(1), 1, "the delay slot on the next page must still execute");
    assert!(machine.cpu.crosspage_delayslot);
    assert_eq!(machine.cpu.stats.branches_taken, 1);
}
