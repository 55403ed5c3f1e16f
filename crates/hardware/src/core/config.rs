//! Configuration for the emulated machine.
//!
//! Grounded on the teacher's `config.rs` defaults-module-plus-serde-default
//! pattern: baseline constants live in [`defaults`], and every field of
//! [`MachineConfig`] falls back to one of them when absent from a loaded
//! TOML topology file. This module implements SPEC_FULL.md's "Ambient:
//! configuration" section.

use serde::Deserialize;

/// Baseline hardware constants, used whenever a config file omits a field.
pub mod defaults {
    /// Default RAM size backing the `"ram"` component class (16 MiB).
    pub const RAM_SIZE: usize = 16 * 1024 * 1024;

    /// Default base address of main RAM.
    pub const RAM_BASE: u64 = 0x0000_0000;

    /// Default number of SPARC register windows (`nwindows`, v8 typical).
    pub const NWINDOWS: u32 = 8;

    /// Default starting program counter.
    pub const START_PC: u64 = RAM_BASE;

    /// Guest page size in bytes, used to size translation-cache slots.
    pub const PAGE_SIZE: usize = 4096;

    /// `log2(PAGE_SIZE)`, the shift that splits an address into page
    /// number and in-page offset.
    pub const PAGE_SHIFT: u32 = 12;
}

/// Root configuration structure for a machine run.
///
/// Loaded from an optional TOML topology file (see
/// [`MachineConfig::from_toml_str`]) layered over [`MachineConfig::default`].
#[derive(Debug, Clone, Deserialize)]
pub struct MachineConfig {
    /// General run settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory layout settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// CPU model settings.
    #[serde(default)]
    pub cpu: CpuConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            memory: MemoryConfig::default(),
            cpu: CpuConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Parses a TOML topology file's contents, falling back to
    /// [`MachineConfig::default`] for any section or field left out.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Initial program counter.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u64,
    /// Maximum instructions to dispatch before stopping, or `None` to run
    /// until a guest halt or external stop request.
    #[serde(default)]
    pub max_instructions: Option<u64>,
}

impl GeneralConfig {
    fn default_start_pc() -> u64 {
        defaults::START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: defaults::START_PC,
            max_instructions: None,
        }
    }
}

/// Main memory layout settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// RAM base address.
    #[serde(default = "MemoryConfig::default_ram_base")]
    pub ram_base: u64,
    /// RAM size in bytes.
    #[serde(default = "MemoryConfig::default_ram_size")]
    pub ram_size: usize,
}

impl MemoryConfig {
    fn default_ram_base() -> u64 {
        defaults::RAM_BASE
    }
    fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
        }
    }
}

/// CPU model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CpuConfig {
    /// Number of register windows (`nwindows`).
    #[serde(default = "CpuConfig::default_nwindows")]
    pub nwindows: u32,
    /// Whether the CPU runs in 32-bit (v8) mode rather than 64-bit (v9).
    #[serde(default)]
    pub is_32bit: bool,
}

impl CpuConfig {
    fn default_nwindows() -> u32 {
        defaults::NWINDOWS
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            nwindows: defaults::NWINDOWS,
            is_32bit: true,
        }
    }
}
