//! Locations that tie a diagnostic to a signal, ring position, or domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in the requirement or the ring a diagnostic applies.
///
/// Requirements have no useful byte spans once parsed, so diagnostics point
/// at the entity the user can act on instead: the n-th requested signal, a
/// position string, a voltage domain, or a configuration key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Location {
    /// No specific location.
    Unknown,
    /// A requested signal, by its index in the user's input order.
    Signal {
        /// Index in the user's input order.
        index: usize,
        /// The signal name as written by the user.
        name: String,
    },
    /// A ring position string such as `left_3` or `top_1_2`.
    Position(String),
    /// A voltage domain, by name.
    Domain(String),
    /// A configuration key such as `nets.common_ground`.
    Config(String),
}

impl Location {
    /// Creates a signal location.
    pub fn signal(index: usize, name: impl Into<String>) -> Self {
        Location::Signal {
            index,
            name: name.into(),
        }
    }

    /// Returns `true` if this location carries no information.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Location::Unknown)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => write!(f, "<unknown>"),
            Location::Signal { index, name } => write!(f, "signal #{index} '{name}'"),
            Location::Position(pos) => write!(f, "position {pos}"),
            Location::Domain(name) => write!(f, "domain '{name}'"),
            Location::Config(key) => write!(f, "config {key}"),
        }
    }
}
