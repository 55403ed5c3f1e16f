//! SPARC v8/v9 system simulator library.
//!
//! This crate implements:
//! 1. **Common:** shared vocabulary (endianness, access direction/hint).
//! 2. **Component:** the live, clonable, checksummable component tree, its
//!    factory/grammar, and the address/data bus capability.
//! 3. **Core:** CPU architectural state (register windows, condition
//!    codes), the error taxonomy, configuration, and the translation
//!    cache (`xlate`) that drives dispatch.
//! 4. **ISA:** the SPARC v8/v9 decoder and instruction handlers.
//! 5. **Sim:** `Machine`, tying a CPU, guest bus, and translation cache
//!    into something that can load an image and run it.

/// Shared small types (endianness, access direction/hint).
pub mod common;
/// The component tree: nodes, variables, the factory, and the bus
/// capability.
pub mod component;
/// CPU architectural state, configuration, the error taxonomy, and the
/// translation cache.
pub mod core;
/// The SPARC v8/v9 decoder and instruction handlers.
pub mod isa;
/// `Machine`: a runnable CPU + guest bus + translation cache.
pub mod sim;

/// Root configuration type for a machine run.
pub use crate::core::config::MachineConfig;
/// CPU architectural state.
pub use crate::core::cpu::Cpu;
/// The error taxonomy shared across decode, dispatch, and the component
/// tree.
pub use crate::core::error::EmulatorError;
/// A fully assembled, runnable machine.
pub use crate::sim::Machine;
