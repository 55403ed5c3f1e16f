//! `Cpu`'s architectural-register accessors.
