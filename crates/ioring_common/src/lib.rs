//! Shared foundational types used across the IO-ring compiler workspace.
//!
//! This crate provides content hashing for graph fingerprints, the internal
//! error result type, and helpers for pad net names that may carry a
//! bracketed bus index.

#![warn(missing_docs)]

pub mod hash;
pub mod net;
pub mod result;

pub use hash::ContentHash;
pub use net::{base_name, split_bus_index, with_core_suffix};
pub use result::{InternalError, IoRingResult};
