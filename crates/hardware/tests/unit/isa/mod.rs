//! SPARC v8/v9 decode/dispatch tests.

/// Instruction-level scenarios and properties (sethi/or, branches,
/// overflow flags, call/retl, register windows).
pub mod sparc;
