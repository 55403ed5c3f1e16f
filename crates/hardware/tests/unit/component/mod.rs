//! Component tree tests: path addressing, unique naming, checksum
//! stability, and the serialize/deserialize round-trip.

/// E1: `FindPathByPartialMatch` against a small bus topology.
pub mod path;
/// E2: unique sibling auto-naming, and name stability after removal.
pub mod naming;
/// Testable property 2: a serialize/deserialize round-trip preserves the
/// checksum.
pub mod serde_roundtrip;
