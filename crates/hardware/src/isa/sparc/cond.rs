//! The 4-bit branch condition field, shared by icc and xcc branches.

use crate::core::arch::ccr::Flags;

/// Evaluates SPARC condition code `cond` (0-15) against one flags
/// nibble. The N/Z/V-only formulas spec.md §4.6 spells out (`be`, `bne`,
/// `bl`, `ble`, `bg`, `bge`, `ba`) are a subset of the full architectural
/// table; the remaining codes follow the same manual (spec.md §9: "match
/// the architecture manual rather than the exemplar").
pub fn taken(cond: u32, flags: &Flags) -> bool {
    let n = flags.n;
    let z = flags.z;
    let v = flags.v;
    let c = flags.c;
    match cond & 0xF {
        0x0 => false,             // bn
        0x1 => z,                 // be
        0x2 => z || (n ^ v),      // ble
        0x3 => n ^ v,             // bl
        0x4 => c || z,            // bleu
        0x5 => c,                 // bcs
        0x6 => n,                 // bneg
        0x7 => v,                 // bvs
        0x8 => true,              // ba
        0x9 => !z,                // bne
        0xA => !(z || (n ^ v)),   // bg
        0xB => !(n ^ v),          // bge
        0xC => !(c || z),         // bgu
        0xD => !c,                // bcc
        0xE => !n,                // bpos
        0xF => !v,                // bvc
        _ => unreachable!("cond is masked to 4 bits"),
    }
}
