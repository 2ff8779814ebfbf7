//! Labels that point at related locations within a diagnostic.

use crate::location::Location;
use serde::{Deserialize, Serialize};

/// The role of a diagnostic label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// The main offending location.
    Primary,
    /// Additional context (e.g., the other member of a colliding pair).
    Secondary,
}

/// An annotated location within a diagnostic, such as one of several
/// signals that break a domain's contiguity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The location this label annotates.
    pub location: Location,
    /// The message displayed next to the location.
    pub message: String,
    /// Whether this is a primary or secondary label.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_label() {
        let label = Label::primary(Location::signal(2, "CLK"), "interrupts the domain");
        assert_eq!(label.style, LabelStyle::Primary);
        assert_eq!(label.message, "interrupts the domain");
    }

    #[test]
    fn secondary_label() {
        let label = Label::secondary(Location::Position("left_0".into()), "first member");
        assert_eq!(label.style, LabelStyle::Secondary);
    }
}
