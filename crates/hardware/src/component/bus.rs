//! The address/data bus capability (spec component C).
//!
//! Grounded on `original_source/src/components/busses/MainbusComponent.cc`
//! (a literal no-op skeleton: address-select latches a value, reads and
//! writes do nothing until a device overrides them) and the teacher's
//! `soc::traits::Device` trait (byte/half/word/doubleword read/write by
//! offset). spec.md §4.3 describes the bus as a *capability* — a set of
//! methods a component implements — not a single concrete type, so this
//! module defines the trait plus the two concrete implementors spec.md
//! names: the generic main bus skeleton and RAM.

use crate::common::Endianness;

/// The address/data bus contract (spec.md §4.3).
///
/// `address_select` must precede each typed transfer; an implementation
/// may latch state across consecutive transfers to the same address.
/// Endianness is passed per multi-byte call since heterogeneous devices
/// may share a bus.
pub trait AddressDataBus {
    /// Selects the target address of subsequent typed reads/writes.
    fn address_select(&mut self, addr: u64);
    /// Reads one byte from the selected address (no endianness needed).
    fn read_u8(&mut self) -> u8;
    /// Writes one byte to the selected address.
    fn write_u8(&mut self, value: u8);
    /// Reads two bytes from the selected address in the given order.
    fn read_u16(&mut self, endian: Endianness) -> u16;
    /// Writes two bytes to the selected address in the given order.
    fn write_u16(&mut self, value: u16, endian: Endianness);
    /// Reads four bytes from the selected address in the given order.
    fn read_u32(&mut self, endian: Endianness) -> u32;
    /// Writes four bytes to the selected address in the given order.
    fn write_u32(&mut self, value: u32, endian: Endianness);
    /// Reads eight bytes from the selected address in the given order.
    fn read_u64(&mut self, endian: Endianness) -> u64;
    /// Writes eight bytes to the selected address in the given order.
    fn write_u64(&mut self, value: u64, endian: Endianness);
}

/// The generic main bus: a no-op skeleton. Reads always return zero,
/// writes are discarded. Concrete machines replace this with devices
/// that actually decode addresses (spec.md: "the generic main bus is a
/// no-op skeleton that devices later replace").
#[derive(Debug, Default)]
pub struct MainbusComponent {
    selected: u64,
}

impl MainbusComponent {
    /// Creates a fresh main bus with no address selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently selected address, for inspection/testing.
    pub fn selected_address(&self) -> u64 {
        self.selected
    }
}

impl AddressDataBus for MainbusComponent {
    fn address_select(&mut self, addr: u64) {
        self.selected = addr;
    }
    fn read_u8(&mut self) -> u8 {
        0
    }
    fn write_u8(&mut self, _value: u8) {}
    fn read_u16(&mut self, _endian: Endianness) -> u16 {
        0
    }
    fn write_u16(&mut self, _value: u16, _endian: Endianness) {}
    fn read_u32(&mut self, _endian: Endianness) -> u32 {
        0
    }
    fn write_u32(&mut self, _value: u32, _endian: Endianness) {}
    fn read_u64(&mut self, _endian: Endianness) -> u64 {
        0
    }
    fn write_u64(&mut self, _value: u64, _endian: Endianness) {}
}

/// A flat byte-addressable backing store, the functional `"ram"` /
/// `"rom"` device class spec.md's data model names. Addresses are
/// relative to the RAM's own base (the caller — typically `GuestBus` in
/// `crate::sim` — is responsible for range routing across devices).
#[derive(Debug)]
pub struct RamComponent {
    bytes: Vec<u8>,
    selected: u64,
}

impl RamComponent {
    /// Creates `size` bytes of zeroed RAM.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
            selected: 0,
        }
    }

    /// Direct slice access, used for bulk image loading and for the
    /// translation cache's fast host-pointer instruction fetch path.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable direct slice access, used for bulk image loading.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether this RAM has zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn idx(&self, len: usize) -> usize {
        self.selected as usize % self.bytes.len().max(1).max(len)
    }
}

impl AddressDataBus for RamComponent {
    fn address_select(&mut self, addr: u64) {
        self.selected = addr;
    }

    fn read_u8(&mut self) -> u8 {
        let i = self.idx(1);
        self.bytes.get(i).copied().unwrap_or(0)
    }

    fn write_u8(&mut self, value: u8) {
        let i = self.idx(1);
        if let Some(slot) = self.bytes.get_mut(i) {
            *slot = value;
        }
    }

    fn read_u16(&mut self, endian: Endianness) -> u16 {
        let i = self.idx(2);
        let bytes = [
            self.bytes.get(i).copied().unwrap_or(0),
            self.bytes.get(i + 1).copied().unwrap_or(0),
        ];
        match endian {
            Endianness::Big => u16::from_be_bytes(bytes),
            Endianness::Little => u16::from_le_bytes(bytes),
        }
    }

    fn write_u16(&mut self, value: u16, endian: Endianness) {
        let i = self.idx(2);
        let bytes = match endian {
            Endianness::Big => value.to_be_bytes(),
            Endianness::Little => value.to_le_bytes(),
        };
        for (off, b) in bytes.iter().enumerate() {
            if let Some(slot) = self.bytes.get_mut(i + off) {
                *slot = *b;
            }
        }
    }

    fn read_u32(&mut self, endian: Endianness) -> u32 {
        let i = self.idx(4);
        let mut bytes = [0u8; 4];
        for (off, b) in bytes.iter_mut().enumerate() {
            *b = self.bytes.get(i + off).copied().unwrap_or(0);
        }
        match endian {
            Endianness::Big => u32::from_be_bytes(bytes),
            Endianness::Little => u32::from_le_bytes(bytes),
        }
    }

    fn write_u32(&mut self, value: u32, endian: Endianness) {
        let i = self.idx(4);
        let bytes = match endian {
            Endianness::Big => value.to_be_bytes(),
            Endianness::Little => value.to_le_bytes(),
        };
        for (off, b) in bytes.iter().enumerate() {
            if let Some(slot) = self.bytes.get_mut(i + off) {
                *slot = *b;
            }
        }
    }

    fn read_u64(&mut self, endian: Endianness) -> u64 {
        let i = self.idx(8);
        let mut bytes = [0u8; 8];
        for (off, b) in bytes.iter_mut().enumerate() {
            *b = self.bytes.get(i + off).copied().unwrap_or(0);
        }
        match endian {
            Endianness::Big => u64::from_be_bytes(bytes),
            Endianness::Little => u64::from_le_bytes(bytes),
        }
    }

    fn write_u64(&mut self, value: u64, endian: Endianness) {
        let i = self.idx(8);
        let bytes = match endian {
            Endianness::Big => value.to_be_bytes(),
            Endianness::Little => value.to_le_bytes(),
        };
        for (off, b) in bytes.iter().enumerate() {
            if let Some(slot) = self.bytes.get_mut(i + off) {
                *slot = *b;
            }
        }
    }
}
