//! Diagnostic creation, severity management, and terminal rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels,
//! codes, ring locations, and secondary labels. The thread-safe
//! [`DiagnosticSink`] accumulates diagnostics during a compiler run, and
//! [`DiagnosticRenderer`] implementations format them for the terminal.
//! Machine-readable output is the `serde` representation of [`Diagnostic`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode, Stage};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use location::Location;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
