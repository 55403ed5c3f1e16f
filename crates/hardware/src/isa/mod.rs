//! Guest instruction set definitions.
//!
//! One submodule per supported architecture; `sparc` is the exemplar
//! this implementation carries through end to end.

/// The SPARC v8/v9 decoder and instruction handlers.
pub mod sparc;
