//! Parsing and validation of IO-ring requirement files.
//!
//! This crate reads a TOML requirement (ring geometry, ordered pad signals,
//! per-signal overrides, inner pad insertions, declared voltage domains, and
//! naming defaults) and produces a strongly-typed [`Requirement`]. It also
//! resolves the classifier name-pattern tables and default net names into
//! the explicit objects the compiler consumes.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_requirement, load_requirement_from_str};
pub use resolve::{resolve_nets, resolve_patterns, PatternTable, ResolvedNets};
pub use types::*;
