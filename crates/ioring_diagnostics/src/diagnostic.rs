//! The [`Diagnostic`] record reported by every compiler stage.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::location::Location;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One problem found in a requirement.
///
/// Unclassifiable signals, broken domains, placement conflicts and colliding
/// labels all reach the caller as diagnostics. The `location` is the ring
/// element the problem is about; `labels` point at other elements involved,
/// such as the pad that interrupts a domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Stable code, e.g. `E202`.
    pub code: DiagnosticCode,
    /// One-line description.
    pub message: String,
    /// Ring element the problem is about.
    pub location: Location,
    /// Other elements involved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Background facts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Suggested fixes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic of any severity.
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates an error.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Error, code, message, location)
    }

    /// Creates a warning.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Warning, code, message, location)
    }

    /// Points at another ring element.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Appends a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Appends a suggested fix.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

/// `error[E101] at signal #1 '???': cannot classify signal`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.severity, self.code)?;
        if !self.location.is_unknown() {
            write!(f, " at {}", self.location)?;
        }
        write!(f, ": {}", self.message)
    }
}
