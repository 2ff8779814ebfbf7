//! IO-ring intent-graph compiler.
//!
//! This crate turns a [`Requirement`] into a validated [`IntentGraph`]: the
//! ring configuration plus every pad, inner pad, and corner cell in
//! traversal order, each with its device and pin connections.
//!
//! # Pipeline
//!
//! 1. **Classify**: assign each signal a functional class
//! 2. **Place**: map signals to sides and indices, splice inner pads
//! 3. **Domains**: group analog supplies into voltage domains, pick providers
//! 4. **Corners**: type each corner from its two neighbours
//! 5. **Pins**: choose devices and synthesize pin connections
//! 6. **Assemble**: splice corners and emit the graph
//!
//! Requirement problems are reported as diagnostics; the pipeline halts
//! after classification, placement, or domain resolution when that stage
//! reported an error. The compiler is pure: it reads the requirement and
//! writes only to the sink it is given.
//!
//! # Usage
//!
//! ```ignore
//! use ioring_compiler::compile_requirement;
//!
//! let report = compile_requirement(&requirement)?;
//! if let Some(compilation) = report.compilation {
//!     println!("{}", compilation.graph.to_json()?);
//! }
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod codes;
pub mod corner;
pub mod domain;
pub mod graph;
pub mod ids;
pub mod pins;
pub mod placement;
pub mod signal;
pub mod stats;

pub use classify::{Classifier, ClassifyError};
pub use corner::{Corner, CornerKind};
pub use domain::{DomainMap, DomainSummary, VoltageDomain};
pub use graph::{Instance, InstanceKind, IntentGraph, PinConnection, PinMap};
pub use ids::{DomainId, SignalId};
pub use placement::{CornerSlot, Placement, Position, PositionParseError, Side};
pub use signal::{Role, Signal, SignalClass, SignalTable};
pub use stats::GraphStats;

use ioring_common::IoRingResult;
use ioring_config::{resolve_nets, resolve_patterns, Requirement};
use ioring_diagnostics::{Diagnostic, DiagnosticSink};

/// A successful compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// The intent graph.
    pub graph: IntentGraph,
    /// The classified signals.
    pub signals: SignalTable,
    /// The resolved voltage domains.
    pub domains: DomainMap,
}

impl Compilation {
    /// Name-level summaries of the resolved domains.
    pub fn domain_summaries(&self) -> Vec<DomainSummary> {
        self.domains.summaries(&self.signals)
    }
}

/// The outcome of an isolated compile run.
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// The compilation, absent when an error halted the pipeline.
    pub compilation: Option<Compilation>,
    /// Every diagnostic the run produced, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileReport {
    /// Returns `true` if any error-severity diagnostic was produced.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Number of non-error diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| !d.severity.is_error())
            .count()
    }
}

/// Runs the full pipeline, reporting requirement problems into `sink`.
///
/// Returns `Ok(None)` when an error halted the pipeline, and `Err` only for
/// broken internal invariants.
pub fn compile(requirement: &Requirement, sink: &DiagnosticSink) -> IoRingResult<Option<Compilation>> {
    let _span = tracing::info_span!(
        "compile",
        signals = requirement.signals.len(),
        inner = requirement.inner_pads.len()
    )
    .entered();

    let patterns = resolve_patterns(&requirement.classifier);
    let nets = resolve_nets(&requirement.nets);

    let classifier = Classifier::new(&patterns, &requirement.devices, &nets);
    let signals = classify::classify_signals(requirement, &classifier, sink);
    if sink.has_errors() {
        tracing::debug!("halted after classification");
        return Ok(None);
    }

    let placement = placement::place(&signals, &requirement.ring, sink);
    if sink.has_errors() {
        tracing::debug!("halted after placement");
        return Ok(None);
    }

    let domains = domain::resolve_domains(
        &signals,
        &placement,
        &patterns,
        &nets,
        &requirement.domains,
        sink,
    );
    if sink.has_errors() {
        tracing::debug!("halted after domain resolution");
        return Ok(None);
    }

    let corners = corner::resolve_corners(&requirement.ring, &placement, &signals, &requirement.devices);
    let synthesizer = pins::PinSynthesizer::new(&signals, &domains, &requirement.devices, &nets);
    let pads = synthesizer.instances(&placement)?;
    pins::check_ground_collisions(&domains, &signals, &nets, sink);

    let graph = graph::assemble(&requirement.ring, pads, &corners)?;
    tracing::info!(
        instances = graph.instances.len(),
        domains = domains.len(),
        fingerprint = %graph.fingerprint()?,
        "compiled intent graph"
    );
    Ok(Some(Compilation {
        graph,
        signals,
        domains,
    }))
}

/// Compiles with a fresh sink and collects its diagnostics.
pub fn compile_requirement(requirement: &Requirement) -> IoRingResult<CompileReport> {
    let sink = DiagnosticSink::new();
    let compilation = compile(requirement, &sink)?;
    Ok(CompileReport {
        compilation,
        diagnostics: sink.take_all(),
    })
}
