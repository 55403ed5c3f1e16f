//! Unit test tree, organized by the module it exercises.

/// Component tree: paths, naming, checksums, serialization round-trips.
pub mod component;
/// The SPARC v8/v9 decoder and instruction handlers.
pub mod isa;
/// The running machine: dispatch loop and page-boundary stitching.
pub mod sim;
