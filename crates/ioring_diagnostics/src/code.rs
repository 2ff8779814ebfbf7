//! Stable diagnostic codes such as `E201` or `C401`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Kind of problem a code reports; fixes the code's leading letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// The requirement cannot be compiled as written (`E`).
    Error,
    /// The ring compiles but something looks unintended (`W`).
    Warning,
    /// A naming or net default collides with the design (`C`).
    Config,
}

impl Category {
    /// Leading letter of codes in this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Config => 'C',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'E' => Some(Category::Error),
            'W' => Some(Category::Warning),
            'C' => Some(Category::Config),
            _ => None,
        }
    }
}

/// Compiler stage that owns a code, taken from its hundreds digit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stage {
    /// `1xx`: signal classification.
    Classification,
    /// `2xx`: voltage domain resolution.
    Domains,
    /// `3xx`: ring placement and inner pads.
    Placement,
    /// `4xx`: pin and net synthesis.
    Pins,
}

/// A category letter plus a three-digit number.
///
/// Serialized in its displayed form, e.g. `"E202"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DiagnosticCode {
    /// Category of the code.
    pub category: Category,
    /// Number within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// The stage this code belongs to, if its number follows the stage scheme.
    pub fn stage(self) -> Option<Stage> {
        match self.number / 100 {
            1 => Some(Stage::Classification),
            2 => Some(Stage::Domains),
            3 => Some(Stage::Placement),
            4 => Some(Stage::Pins),
            _ => None,
        }
    }

    /// Parses the displayed form, e.g. `"W301"`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let category = Category::from_prefix(chars.next()?)?;
        let digits = chars.as_str();
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(|n| Self::new(category, n))
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DiagnosticCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid diagnostic code '{text}'")))
    }
}
