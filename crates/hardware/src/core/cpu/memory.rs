//! Guest memory access (`memory_rw`).
//!
//! Grounded on the teacher's `Cpu::memory_rw`-via-bus pattern
//! (`soc::interconnect::Bus` read/write methods called from
//! `core::cpu::memory`), generalized to spec.md §4.4's free-function
//! shape: `memory_rw(cpu, mem, addr, buf, len, dir, hint)`.

use crate::common::{AccessDirection, AccessHint};
use crate::component::AddressDataBus;
use crate::core::cpu::Cpu;
use crate::core::error::EmulatorError;

/// Transfers `buf.len()` bytes between guest memory at `addr` and `buf`,
/// in the direction `dir`. `hint` distinguishes an instruction fetch
/// from an ordinary data access for fault reporting (spec.md §7b).
///
/// The `cpu` parameter is taken for symmetry with spec.md's signature
/// and so a future caller can annotate faults with CPU state; this
/// implementation's bus never itself faults (see `RamComponent`), so it
/// is otherwise unused here.
pub fn memory_rw(
    _cpu: &mut Cpu,
    bus: &mut dyn AddressDataBus,
    addr: u64,
    buf: &mut [u8],
    dir: AccessDirection,
    hint: AccessHint,
) -> Result<(), EmulatorError> {
    for (i, byte) in buf.iter_mut().enumerate() {
        let a = addr.checked_add(i as u64).ok_or(EmulatorError::MemoryFault { addr, hint })?;
        bus.address_select(a);
        match dir {
            AccessDirection::Read => *byte = bus.read_u8(),
            AccessDirection::Write => bus.write_u8(*byte),
        }
    }
    Ok(())
}
