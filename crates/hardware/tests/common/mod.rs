//! Shared test infrastructure for the hardware integration suite.
//!
//! Grounded on the teacher's `tests/common` harness module (a small
//! builder over the production `Cpu`/`Bus`/`Machine` types rather than a
//! parallel test-only model), adapted here to SPARC's big-endian
//! instruction words and `Machine::new`/`load_image`/`step` API.

use sparc_core::core::config::MachineConfig;
use sparc_core::Machine;

/// Builds a fresh [`Machine`] with the default topology (32-bit, 16 MiB
/// RAM at address 0) and loads `words` as its instruction stream,
/// starting at the configured `start_pc`.
pub fn machine_with_program(words: &[u32]) -> Machine {
    let config = MachineConfig::default();
    let mut machine = Machine::new(&config);
    let mut image = Vec::with_capacity(words.len() * 4);
    for word in words {
        image.extend_from_slice(&word.to_be_bytes());
    }
    machine.load_image(&image);
    machine
}

/// Steps `machine` `n` times, panicking on the first dispatch error (test
/// programs are hand-assembled and expected to never fault).
pub fn step_n(machine: &mut Machine, n: usize) {
    for _ in 0..n {
        machine.step().expect("test program dispatched cleanly");
    }
}
