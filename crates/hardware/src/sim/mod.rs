//! The running machine: a CPU, a guest address bus, and the translation
//! cache that ties dispatch to both.
//!
//! Grounded on the teacher's `soc::Machine` (owns `Cpu` plus a `Bus`,
//! exposes `step`/`run`, and is built either directly from a `Config` or
//! by walking a device list) — here a device list is the live component
//! tree, walked by [`Machine::from_tree`].

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::common::{AccessDirection, AccessHint, Endianness};
use crate::component::{AddressDataBus, ComponentRef, MainbusComponent, RamComponent};
use crate::core::config::{CpuConfig, MachineConfig};
use crate::core::cpu::memory::memory_rw;
use crate::core::cpu::Cpu;
use crate::core::error::{DelaySlotState, EmulatorError};
use crate::core::xlate::page::{END_OF_PAGE2_SLOT, END_OF_PAGE_SLOT, PAGE_SIZE_BYTES};
use crate::core::xlate::{Flow, PageTable};
use crate::isa::sparc::decode;

/// Trap type installed for a register-window spill/fill condition, in
/// the SPARC v8 trap-table numbering (`clean_window`).
const WINDOW_TRAP_TYPE: u8 = 0x24;

/// The guest's physical address bus: routes a selected address to RAM
/// when it falls inside RAM's range, and to the no-op main bus skeleton
/// otherwise (spec.md §4.3's "devices decode their own address range").
struct GuestBus {
    ram_base: u64,
    ram: RamComponent,
    mainbus: MainbusComponent,
    selected: u64,
}

impl GuestBus {
    fn new(ram_base: u64, ram_size: usize) -> Self {
        Self {
            ram_base,
            ram: RamComponent::new(ram_size),
            mainbus: MainbusComponent::new(),
            selected: 0,
        }
    }

    fn route(&mut self) -> &mut dyn AddressDataBus {
        let in_ram = self.selected >= self.ram_base
            && (self.selected - self.ram_base) < self.ram.len() as u64;
        if in_ram {
            self.ram.address_select(self.selected - self.ram_base);
            &mut self.ram
        } else {
            self.mainbus.address_select(self.selected);
            &mut self.mainbus
        }
    }

    fn load_image(&mut self, bytes: &[u8]) {
        let dst = self.ram.as_mut_slice();
        let n = bytes.len().min(dst.len());
        dst[..n].copy_from_slice(&bytes[..n]);
    }
}

impl AddressDataBus for GuestBus {
    fn address_select(&mut self, addr: u64) {
        self.selected = addr;
    }
    fn read_u8(&mut self) -> u8 {
        self.route().read_u8()
    }
    fn write_u8(&mut self, value: u8) {
        self.route().write_u8(value)
    }
    fn read_u16(&mut self, endian: Endianness) -> u16 {
        self.route().read_u16(endian)
    }
    fn write_u16(&mut self, value: u16, endian: Endianness) {
        self.route().write_u16(value, endian)
    }
    fn read_u32(&mut self, endian: Endianness) -> u32 {
        self.route().read_u32(endian)
    }
    fn write_u32(&mut self, value: u32, endian: Endianness) {
        self.route().write_u32(value, endian)
    }
    fn read_u64(&mut self, endian: Endianness) -> u64 {
        self.route().read_u64(endian)
    }
    fn write_u64(&mut self, value: u64, endian: Endianness) {
        self.route().write_u64(value, endian)
    }
}

/// A fully assembled, runnable machine: CPU state, guest memory, and the
/// translation cache's address-space index.
pub struct Machine {
    /// SPARC CPU architectural state.
    pub cpu: Cpu,
    bus: GuestBus,
    table: PageTable,
}

impl Machine {
    /// Builds a machine directly from a [`MachineConfig`], without going
    /// through the component tree. The usual path for the CLI and for
    /// unit tests that don't need tree inspection.
    pub fn new(config: &MachineConfig) -> Self {
        let cpu = Cpu::new(&config.cpu, config.general.start_pc);
        let bus = GuestBus::new(config.memory.ram_base, config.memory.ram_size);
        let table = PageTable::new(config.cpu.is_32bit);
        Machine { cpu, bus, table }
    }

    /// Builds a machine by walking a live component tree: finds the
    /// first `"sparc_cpu"` and `"ram"` descendants (pre-order) and reads
    /// their bound variables to seed the CPU and guest bus. Fails if
    /// either is missing.
    pub fn from_tree(root: &ComponentRef) -> Result<Self, EmulatorError> {
        let cpu_node = find_by_class(root, "sparc_cpu")
            .ok_or(EmulatorError::Structural("no sparc_cpu component in tree"))?;
        let ram_node = find_by_class(root, "ram")
            .ok_or(EmulatorError::Structural("no ram component in tree"))?;

        let is_32bit = match cpu_node.borrow().get_variable("is_32bit") {
            Ok(crate::component::Variable::U8(v)) => v != 0,
            _ => true,
        };
        let ram_base = match ram_node.borrow().get_variable("base") {
            Ok(crate::component::Variable::U64(v)) => v,
            _ => 0,
        };
        let ram_size = match ram_node.borrow().get_variable("size") {
            Ok(crate::component::Variable::U64(v)) => v as usize,
            _ => crate::core::config::defaults::RAM_SIZE,
        };

        let cpu_config = CpuConfig {
            nwindows: crate::core::config::defaults::NWINDOWS,
            is_32bit,
        };
        let cpu = Cpu::new(&cpu_config, ram_base);
        let bus = GuestBus::new(ram_base, ram_size);
        let table = PageTable::new(is_32bit);
        Ok(Machine { cpu, bus, table })
    }

    /// Copies `bytes` into the start of guest RAM (a raw boot image, with
    /// no header or relocation).
    pub fn load_image(&mut self, bytes: &[u8]) {
        self.bus.load_image(bytes);
    }

    /// A handle the caller can hand to another thread to request a
    /// cooperative stop (spec.md §5).
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.cpu.stop_requested.clone()
    }

    /// Dispatches guest instructions until `max_instructions` have been
    /// counted, the cooperative stop flag is raised, or a handler
    /// returns an error.
    pub fn run(&mut self, max_instructions: Option<u64>) -> Result<(), EmulatorError> {
        loop {
            if self.cpu.stop_requested() {
                return Ok(());
            }
            if let Some(max) = max_instructions {
                if self.cpu.n_translated_instrs >= max {
                    return Ok(());
                }
            }
            self.step()?;
        }
    }

    /// Dispatches exactly one translation-cache slot, following
    /// page-boundary sentinels until a real guest instruction (or a
    /// further error) results.
    pub fn step(&mut self) -> Result<(), EmulatorError> {
        self.cpu.crosspage_delayslot = false;
        self.resolve_current();
        let page = self
            .cpu
            .cur_ic_page
            .clone()
            .expect("resolve_current always installs a page");
        let slot = page.borrow().slots[self.cpu.next_ic].clone();
        let flow = match (slot.f)(self, slot.arg) {
            Ok(flow) => flow,
            Err(EmulatorError::WindowTrap) => {
                self.cpu.enter_trap(WINDOW_TRAP_TYPE);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        match flow {
            Flow::Continue => {
                self.cpu.pc += 4;
                self.cpu.next_ic += 1;
                self.cpu.n_translated_instrs += 1;
            }
            Flow::Jump(pc) => {
                self.cpu.pc = pc;
                self.cpu.n_translated_instrs += 1;
                self.resolve_current();
            }
            Flow::PageBoundary(pc) => {
                self.cpu.pc = pc;
                self.resolve_current();
            }
        }
        Ok(())
    }

    /// Decodes the guest instruction at `cpu.pc`, installs it into the
    /// current slot (replacing the `to_be_translated` sentinel), and
    /// immediately dispatches the freshly installed handler (spec.md
    /// §3/§4.5's decode-on-first-touch).
    pub(crate) fn translate_current_slot(&mut self) -> Result<Flow, EmulatorError> {
        let pc = self.cpu.pc;
        let word = self.fetch_instruction_word(pc)?;
        let call = decode::decode_one(word, self.cpu.is_32bit)?;
        let page = self
            .cpu
            .cur_ic_page
            .clone()
            .expect("resolve_current always installs a page before translation");
        page.borrow_mut().slots[self.cpu.next_ic] = call.clone();
        (call.f)(self, call.arg)
    }

    /// Advances `cpu.pc` to the start of the next page, for the ordinary
    /// (non-delay-slot-crossing) page-boundary sentinel.
    pub(crate) fn cross_page_boundary(&mut self) -> Flow {
        let base = self
            .cpu
            .cur_ic_page
            .as_ref()
            .expect("a page boundary can only fire from within a resolved page")
            .borrow()
            .base_addr;
        let next_pc = base + PAGE_SIZE_BYTES;
        self.cpu.pc = next_pc;
        Flow::PageBoundary(next_pc)
    }

    /// Resolves the page after the current one, marks
    /// `crosspage_delayslot`, and chain-dispatches its first slot so the
    /// delay-slot instruction that lives there still executes (spec.md
    /// §4.6, §9).
    pub(crate) fn cross_page_boundary_for_delay_slot(&mut self) -> Result<Flow, EmulatorError> {
        let base = self
            .cpu
            .cur_ic_page
            .as_ref()
            .expect("a page boundary can only fire from within a resolved page")
            .borrow()
            .base_addr;
        let next_base = base + PAGE_SIZE_BYTES;
        self.cpu.crosspage_delayslot = true;
        self.cpu.pc = next_base;
        let page = self.table.lookup_or_create(next_base);
        self.cpu.cur_ic_page = Some(page.clone());
        self.cpu.next_ic = 0;
        let slot = page.borrow().slots[0].clone();
        (slot.f)(self, slot.arg)
    }

    /// Executes the instruction immediately following a branch/call as
    /// its architectural delay slot, before the branch's own control
    /// transfer takes effect. Called from within a branch handler.
    ///
    /// The slot dispatched is `next_ic + 1`, except when that would land
    /// on the ordinary page-end sentinel (`END_OF_PAGE_SLOT`): in that
    /// case dispatch routes to `END_OF_PAGE2_SLOT` instead, so a delay
    /// slot that physically crosses a page boundary is distinguished
    /// from an ordinary sequential page end without recomputing any
    /// address (spec.md §9's resolved open question).
    pub(crate) fn execute_delay_slot(&mut self) -> Result<(), EmulatorError> {
        self.cpu.delay_slot = DelaySlotState::ToBeDelayed;
        let page = self
            .cpu
            .cur_ic_page
            .clone()
            .expect("a branch is only dispatched from within a resolved page");
        let delay_index = if self.cpu.next_ic + 1 == END_OF_PAGE_SLOT {
            END_OF_PAGE2_SLOT
        } else {
            self.cpu.next_ic + 1
        };
        self.cpu.next_ic = delay_index;
        if delay_index != END_OF_PAGE2_SLOT {
            // A same-page delay slot lives at its own address, not the
            // branch's — `end_of_page2` (the cross-page case) sets `pc`
            // itself once it resolves the next page.
            self.cpu.pc = page.borrow().addr_of(delay_index);
        }
        let slot = page.borrow().slots[delay_index].clone();
        // The delay slot's own `Flow` is discarded: a branch/call handler
        // always overwrites `cpu.pc` with its control-transfer target
        // immediately after this call returns, so any PC change the delay
        // slot instruction itself would imply is moot.
        match (slot.f)(self, slot.arg) {
            Ok(_) => {
                self.cpu.delay_slot = DelaySlotState::NotDelayed;
                self.cpu.n_translated_instrs += 1;
                Ok(())
            }
            Err(e) => {
                self.cpu.delay_slot = DelaySlotState::ExceptionInDelaySlot;
                Err(e)
            }
        }
    }

    /// Fetches the big-endian 4-byte instruction word at `pc`.
    pub(crate) fn fetch_instruction_word(&mut self, pc: u64) -> Result<u32, EmulatorError> {
        let mut buf = [0u8; 4];
        memory_rw(
            &mut self.cpu,
            &mut self.bus,
            pc,
            &mut buf,
            AccessDirection::Read,
            AccessHint::Instruction,
        )?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Transfers `buf` between guest memory at `addr` and `buf` (data
    /// access, used by load/store instruction handlers).
    pub(crate) fn data_access(
        &mut self,
        addr: u64,
        buf: &mut [u8],
        dir: AccessDirection,
    ) -> Result<(), EmulatorError> {
        memory_rw(&mut self.cpu, &mut self.bus, addr, buf, dir, AccessHint::Data)
    }

    /// Drops the translation-cache page containing `addr`, so a
    /// subsequent fetch there re-decodes from guest memory instead of
    /// dispatching a stale handler (spec.md §5's self-modifying-code
    /// requirement).
    pub(crate) fn invalidate_page(&mut self, addr: u64) {
        self.table.invalidate(addr);
    }

    /// Re-resolves `cur_ic_page`/`next_ic` from `cpu.pc` if the cursor
    /// doesn't already point into the page containing `pc`. This is the
    /// only place the translation cache is consulted on a control
    /// transfer; straight-line `Flow::Continue` dispatch never calls it.
    fn resolve_current(&mut self) {
        let pc = self.cpu.pc;
        let stale = match &self.cpu.cur_ic_page {
            None => true,
            Some(page) => {
                let base = page.borrow().base_addr;
                pc < base || pc >= base + PAGE_SIZE_BYTES
            }
        };
        if stale {
            let page = self.table.lookup_or_create(pc);
            self.cpu.cur_ic_page = Some(page);
        }
        let base = self.cpu.cur_ic_page.as_ref().unwrap().borrow().base_addr;
        self.cpu.next_ic = ((pc - base) >> crate::core::xlate::INSTR_ALIGNMENT_SHIFT) as usize;
    }
}

fn find_by_class(root: &ComponentRef, class_name: &str) -> Option<ComponentRef> {
    if root.borrow().class_name() == class_name {
        return Some(root.clone());
    }
    for child in root.borrow().children() {
        if let Some(found) = find_by_class(child, class_name) {
            return Some(found);
        }
    }
    None
}
