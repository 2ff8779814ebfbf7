//! Conformance test helpers for the IO-ring intent-graph compiler.
//!
//! Provides shared functions that run requirement TOML text through the full
//! pipeline (load → compile) and look up instances and diagnostics for
//! assertion in integration tests.

#![warn(missing_docs)]

use ioring_compiler::{compile_requirement, CompileReport, Instance, IntentGraph};
use ioring_config::load_requirement_from_str;
use ioring_diagnostics::{Diagnostic, DiagnosticCode};

/// Builds requirement TOML for a ring with bare signal names.
pub fn ring_toml(width: usize, height: usize, order: &str, signals: &[&str]) -> String {
    let quoted: Vec<String> = signals.iter().map(|s| format!("\"{s}\"")).collect();
    format!(
        r#"
signals = [{signals}]

[ring]
width = {width}
height = {height}
placement_order = "{order}"
"#,
        signals = quoted.join(", "),
    )
}

/// Loads and compiles requirement TOML text.
///
/// Panics if the text is not a valid requirement, since conformance inputs
/// are always well-formed TOML.
pub fn compile_toml(toml: &str) -> CompileReport {
    let requirement = load_requirement_from_str(toml).unwrap();
    compile_requirement(&requirement).unwrap()
}

/// Compiles a ring with bare signal names.
pub fn compile_ring(width: usize, height: usize, order: &str, signals: &[&str]) -> CompileReport {
    compile_toml(&ring_toml(width, height, order, signals))
}

/// Compiles and returns the graph, panicking with the diagnostics on failure.
pub fn graph_of(toml: &str) -> IntentGraph {
    let report = compile_toml(toml);
    match report.compilation {
        Some(compilation) => compilation.graph,
        None => {
            let shown: Vec<String> = report.diagnostics.iter().map(|d| d.to_string()).collect();
            panic!("compilation halted:\n{}", shown.join("\n"))
        }
    }
}

/// The instance at `position` (e.g. `left_0`, `top_0_1`, `top_left`).
pub fn instance_at<'a>(graph: &'a IntentGraph, position: &str) -> &'a Instance {
    graph
        .instances
        .iter()
        .find(|i| i.position.to_string() == position)
        .unwrap_or_else(|| panic!("no instance at {position}"))
}

/// The label on `pin` of `instance`.
pub fn pin<'a>(instance: &'a Instance, pin: &str) -> &'a str {
    instance
        .pin_connections
        .get(pin)
        .map(|c| c.label.as_str())
        .unwrap_or_else(|| panic!("{} has no pin {pin}", instance.name))
}

/// Diagnostics of `report` with `code`.
pub fn with_code(report: &CompileReport, code: DiagnosticCode) -> Vec<&Diagnostic> {
    report.diagnostics.iter().filter(|d| d.code == code).collect()
}

/// Returns `true` if `report` holds a diagnostic with `code`.
pub fn has_code(report: &CompileReport, code: DiagnosticCode) -> bool {
    report.diagnostics.iter().any(|d| d.code == code)
}

/// The codes of every diagnostic, as display strings, in emission order.
pub fn code_list(report: &CompileReport) -> Vec<String> {
    report.diagnostics.iter().map(|d| d.code.to_string()).collect()
}
