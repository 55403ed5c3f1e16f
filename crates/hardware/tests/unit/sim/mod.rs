//! The running machine's dispatch loop, across page boundaries.

/// Ordinary sequential execution and a branch delay slot, each crossing
/// from one translated page into the next.
pub mod page_boundary;
