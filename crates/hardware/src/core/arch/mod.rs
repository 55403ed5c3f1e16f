//! Architectural register sub-state shared by every SPARC handler.
//!
//! Split out of `core::cpu::Cpu` the way the teacher splits `csr`/`mode`
//! out of its own `Cpu`: each piece is a small typed wrapper around one
//! architectural concept rather than a pile of loose fields.

/// The condition-code register: parallel `icc`/`xcc` N/Z/V/C nibbles.
pub mod ccr;
/// Register-window shadow storage (globals, per-window outs/locals).
pub mod window;
