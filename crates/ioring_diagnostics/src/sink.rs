//! Per-run diagnostic collection.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Collected {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

/// Collects the diagnostics of one compiler run.
///
/// A sink belongs to exactly one run. Batch compilation creates a fresh sink
/// per requirement, so nothing reported for one ring can leak into another.
/// Counts survive [`take_all`](Self::take_all): a stage that drained the sink
/// still sees that errors were reported.
#[derive(Default)]
pub struct DiagnosticSink {
    inner: Mutex<Collected>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock leaves the vector intact, so poisoning
    // is ignored.
    fn collected(&self) -> MutexGuard<'_, Collected> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        let mut collected = self.collected();
        match diag.severity {
            Severity::Error => collected.errors += 1,
            Severity::Warning => collected.warnings += 1,
            Severity::Note => {}
        }
        collected.diagnostics.push(diag);
    }

    /// Returns `true` once any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.collected().errors
    }

    /// Number of warnings recorded so far.
    pub fn warning_count(&self) -> usize {
        self.collected().warnings
    }

    /// Drains the recorded diagnostics in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.collected().diagnostics)
    }

    /// Copies the recorded diagnostics in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collected().diagnostics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::location::Location;

    fn unclassified(name: &str) -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Error, 101),
            "cannot classify",
            Location::signal(0, name),
        )
    }

    fn underfilled() -> Diagnostic {
        Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 301),
            "unfilled slots",
            Location::Unknown,
        )
    }

    #[test]
    fn starts_empty() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!((sink.error_count(), sink.warning_count()), (0, 0));
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let sink = DiagnosticSink::new();
        sink.emit(underfilled());
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn keeps_emission_order() {
        let sink = DiagnosticSink::new();
        sink.emit(unclassified("A?"));
        sink.emit(underfilled());
        sink.emit(unclassified("B?"));
        let messages: Vec<_> = sink
            .diagnostics()
            .iter()
            .map(|d| d.location.to_string())
            .collect();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Location::signal(0, "A?").to_string());
        assert_eq!(messages[2], Location::signal(0, "B?").to_string());
    }

    #[test]
    fn counts_survive_draining() {
        let sink = DiagnosticSink::new();
        sink.emit(unclassified("X"));
        sink.emit(underfilled());
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
        assert!(sink.has_errors());
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn sinks_share_nothing() {
        let a = DiagnosticSink::new();
        let b = DiagnosticSink::new();
        a.emit(unclassified("X"));
        assert!(a.has_errors());
        assert!(!b.has_errors());
    }
}
