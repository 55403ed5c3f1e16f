//! The multi-level page-table index over the guest address space.
//!
//! Grounded on the teacher's `core::units::mmu::{mod.rs, ptw.rs}` (a
//! multi-level walk producing a leaf descriptor) and `tlb.rs` (a cache
//! fronting the walk) — repurposed here from "walk permission bits to a
//! physical frame" to "walk an index to a physical-page instruction-slot
//! array" per spec.md §4.5. Unlike the teacher's fixed-size, evicting
//! `Tlb`, this index never evicts: a guest physical page is never reused
//! for a different PC range within one run, so a `HashMap`-backed index
//! with no replacement policy is both simpler and correct (see
//! DESIGN.md).

use std::collections::HashMap;

use super::page::{PageRef, PageSlots, PAGE_SIZE_BYTES};

/// Bits of the page-aligned base address assigned to the L1 index.
const L1_SHIFT: u32 = 42;
/// Bits assigned to the L2 index.
const L2_SHIFT: u32 = 24;
/// Width, in bits, of the L1 and L2 index fields.
const LEVEL_BITS: u32 = 18;
const LEVEL_MASK: u64 = (1u64 << LEVEL_BITS) - 1;

/// Index over the guest address space, producing a page's instruction
/// slots for a given address. 32-bit mode uses a single flat level (the
/// top 20 bits of a 32-bit address, per spec.md §3); 64-bit mode splits
/// the address into three levels (L1/L2/L3 over the page-aligned base).
pub struct PageTable {
    is_32bit: bool,
    flat: HashMap<u64, PageRef>,
    l1: HashMap<u64, HashMap<u64, HashMap<u64, PageRef>>>,
}

impl PageTable {
    /// Creates an empty index for the given addressing mode.
    pub fn new(is_32bit: bool) -> Self {
        Self {
            is_32bit,
            flat: HashMap::new(),
            l1: HashMap::new(),
        }
    }

    fn page_base(addr: u64) -> u64 {
        addr & !(PAGE_SIZE_BYTES - 1)
    }

    /// Splits a page-aligned base address into (L1, L2, L3) indices.
    fn split(base: u64) -> (u64, u64, u64) {
        let l1 = (base >> L1_SHIFT) & LEVEL_MASK;
        let l2 = (base >> L2_SHIFT) & LEVEL_MASK;
        let l3 = base & !(PAGE_SIZE_BYTES - 1);
        (l1, l2, l3)
    }

    /// Looks up the page containing `addr`, returning `None` on a miss.
    pub fn lookup(&self, addr: u64) -> Option<PageRef> {
        let base = Self::page_base(addr);
        if self.is_32bit {
            self.flat.get(&base).cloned()
        } else {
            let (l1, l2, l3) = Self::split(base);
            self.l1.get(&l1)?.get(&l2)?.get(&l3).cloned()
        }
    }

    /// Looks up the page containing `addr`, materializing a fresh one
    /// (spec.md §4.5's miss routine) if none exists yet.
    pub fn lookup_or_create(&mut self, addr: u64) -> PageRef {
        let base = Self::page_base(addr);
        if self.is_32bit {
            self.flat
                .entry(base)
                .or_insert_with(|| PageSlots::new(base))
                .clone()
        } else {
            let (l1, l2, l3) = Self::split(base);
            self.l1
                .entry(l1)
                .or_default()
                .entry(l2)
                .or_default()
                .entry(l3)
                .or_insert_with(|| PageSlots::new(base))
                .clone()
        }
    }

    /// Drops a page from the index (spec.md §5: invalidation after a
    /// store to instruction memory happens only between instructions, so
    /// no live dispatch pointer can ever reference a page this removes).
    pub fn invalidate(&mut self, addr: u64) {
        let base = Self::page_base(addr);
        if self.is_32bit {
            self.flat.remove(&base);
        } else {
            let (l1, l2, l3) = Self::split(base);
            if let Some(l2map) = self.l1.get_mut(&l1) {
                if let Some(l3map) = l2map.get_mut(&l2) {
                    l3map.remove(&l3);
                }
            }
        }
    }
}
