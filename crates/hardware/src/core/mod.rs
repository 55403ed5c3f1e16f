//! The CPU shell, translation cache, and ambient machine services.
//!
//! Grounded on the teacher's `core` module split (`core::cpu`,
//! `core::arch`, `core::units::mmu`): architectural register state lives
//! in `cpu`/`arch`, the address-space index lives in `xlate`, and the
//! cross-cutting concerns (errors, configuration, statistics) get their
//! own small modules rather than being folded into `cpu`.

/// Architectural register sub-state: condition codes and window shadow
/// storage.
pub mod arch;
/// Configuration for a machine run.
pub mod config;
/// CPU architectural state and the guest memory access entry point.
pub mod cpu;
/// Error taxonomy for decode, dispatch, and structural failures.
pub mod error;
/// Per-run instruction-mix counters.
pub mod stats;
/// The translation cache: address-space index, page slots, dispatch
/// records.
pub mod xlate;
