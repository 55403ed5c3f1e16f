//! `subcc 0x80000000, 1, %g2` overflows in `icc` but not in `xcc`.

use crate::common::{machine_with_program, step_n};

/// `sethi %hi(0x80000000), %g3`.
const SETHI_HI_0X80000000_G3: u32 = 0x0720_0000;
/// `subcc %g3, 1, %g2`.
const SUBCC_G3_1_G2: u32 = 0x84A0_E001;

#[test]
fn subcc_overflows_in_icc_but_not_xcc() {
    let mut machine = machine_with_program(&[SETHI_HI_0X80000000_G3, SUBCC_G3_1_G2]);
    step_n(&mut machine, 2);

    assert_eq!(machine.cpu.reg(2), 0x7fff_ffff);
    let icc = machine.cpu.ccr.icc;
    assert!(!icc.n);
    assert!(!icc.z);
    assert!(icc.v);

    let xcc = machine.cpu.ccr.xcc;
    assert!(!xcc.v, "0x80000000 - 1 does not overflow a 64-bit subtract");
}
