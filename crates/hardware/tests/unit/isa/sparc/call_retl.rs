//! `call X; nop` then, at `X`, `retl; nop` returns to the original call
//! site plus 8.

use crate::common::{machine_with_program, step_n};

const NOP: u32 = 0x0100_0000; // sethi 0, %g0
const RETL: u32 = 0x81c3_e008; // jmpl %o7 + 8, %g0

/// `call` to a callee 0x100 bytes ahead: `disp30 = 0x100 >> 2 = 0x40`.
const CALL_PLUS_0X100: u32 = 0x4000_0040;

fn program() -> Vec<u32> {
    let mut words = vec![NOP; 0x40 + 2];
    words[0] = CALL_PLUS_0X100;
    words[1] = NOP; // call's delay slot
    words[0x40] = RETL; // the callee, at call_site + 0x100
    words[0x40 + 1] = NOP; // retl's delay slot
    words
}

#[test]
fn o7_at_the_callee_equals_the_call_site_pc() {
    let mut machine = machine_with_program(&program());
    let call_site = machine.cpu.pc;

    step_n(&mut machine, 1); // dispatches `call` (and its delay slot)

    assert_eq!(machine.cpu.pc, call_site + 0x100);
    assert_eq!(machine.cpu.reg(15), call_site, "%o7 must hold the call instruction's own address");
}

#[test]
fn retl_returns_to_call_site_plus_8() {
    let mut machine = machine_with_program(&program());
    let call_site = machine.cpu.pc;

    step_n(&mut machine, 2); // `call` then `retl`, each with its delay slot

    assert_eq!(machine.cpu.pc, call_site + 8);
    assert_eq!(machine.cpu.stats.calls, 1);
}
