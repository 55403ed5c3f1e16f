//! Property 6: `save` then `restore` round-trips register contents bit
//! for bit when no window spill occurs.

use crate::common::{machine_with_program, step_n};

/// `save %g0, 0, %sp` (rd=14/%sp, rs1=0/%g0, i=1, simm13=0): op3=`0x3C`.
const SAVE_G0_0_SP: u32 = 0x9DE0_2000;
/// `restore %g0, 0, %sp`: same fields with op3=`0x3D`.
const RESTORE_G0_0_SP: u32 = 0x9DE8_2000;

#[test]
fn save_then_restore_preserves_local_register_contents() {
    let mut machine = machine_with_program(&[SAVE_G0_0_SP, RESTORE_G0_0_SP]);

    // %l0 (index 16) lives in the pre-save window's locals.
    machine.cpu.set_reg(16, 0xdead_beef_u64);
    let cansave_before = machine.cpu.cansave;
    let canrestore_before = machine.cpu.canrestore;

    step_n(&mut machine, 1); // save

    // After `save` rotates the window forward, the same logical index now
    // names a fresh (zeroed) window's local register.
    assert_eq!(machine.cpu.reg(16), 0, "save must rotate into an unused window");
    assert_eq!(machine.cpu.cansave, cansave_before - 1);
    assert_eq!(machine.cpu.canrestore, canrestore_before + 1);

    step_n(&mut machine, 1); // restore

    assert_eq!(machine.cpu.reg(16), 0xdead_beef_u64, "restore must rotate back to the saved window");
    assert_eq!(machine.cpu.cansave, cansave_before);
    assert_eq!(machine.cpu.canrestore, canrestore_before);
    assert_eq!(machine.cpu.stats.window_saves, 1);
    assert_eq!(machine.cpu.stats.window_restores, 1);
}

/// `save` past the last available window vectors into the trap table
/// rather than silently clobbering a window still in use.
#[test]
fn save_past_available_windows_enters_a_trap() {
    let mut machine = machine_with_program(&[SAVE_G0_0_SP]);
    let nwindows = machine.cpu.windows.nwindows();

    // Exhaust every available window (`cansave` reaches 0 after `nwindows
    // - 1` saves on a freshly reset CPU).
    for _ in 0..(nwindows - 1) {
        machine.cpu.pc = 0;
        step_n(&mut machine, 1);
    }

    assert_eq!(machine.cpu.cansave, 0);
    assert_eq!(machine.cpu.tl, 0);
    machine.cpu.pc = 0;

    machine.step().expect("a window trap is handled, not propagated as fatal");

    assert_eq!(machine.cpu.tl, 1, "save with cansave == 0 must raise the trap level");
    assert_eq!(machine.cpu.tpc, 0, "tpc must record the faulting save's pc");
    assert_eq!(machine.cpu.pc, machine.cpu.tba + (0x24 << 5));
}
