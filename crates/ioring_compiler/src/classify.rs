//! Signal classification.
//!
//! Each requested signal receives exactly one [`SignalClass`] from, in order:
//! the user's role override, the user's device override, the digital supply
//! names, the supply/return substrings, and the analog and digital prefix
//! tables. A signal matched by none of them is reported, never defaulted.

use crate::codes;
use crate::ids::SignalId;
use crate::signal::{ProviderHint, Signal, SignalClass, SignalTable};
use ioring_common::base_name;
use ioring_config::{
    DeclaredRole, DeviceTable, Direction, PatternTable, Requirement, ResolvedNets, SignalSpec,
};
use ioring_diagnostics::{Diagnostic, DiagnosticSink};
use thiserror::Error;

/// Why a signal could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// No override and no name pattern applies.
    #[error("cannot classify signal '{0}'")]
    Unrecognized(String),
    /// The name looks like both a supply and a return.
    #[error("signal '{0}' matches both power and ground patterns")]
    PowerGroundConflict(String),
    /// The device override is not in the device table.
    #[error("device '{device}' of signal '{name}' is not a known pad device")]
    UnknownDevice {
        /// Signal name.
        name: String,
        /// The device as written.
        device: String,
    },
}

/// The outcome of classifying one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Functional class.
    pub class: SignalClass,
    /// Provider participation.
    pub hint: ProviderHint,
    /// Direction for digital IO.
    pub direction: Option<Direction>,
}

impl Classification {
    fn new(class: SignalClass) -> Self {
        Self {
            class,
            hint: ProviderHint::Auto,
            direction: None,
        }
    }

    fn with_hint(mut self, hint: ProviderHint) -> Self {
        self.hint = hint;
        self
    }
}

/// Classifies signals against resolved pattern tables.
pub struct Classifier<'a> {
    patterns: &'a PatternTable,
    devices: &'a DeviceTable,
    nets: &'a ResolvedNets,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier over the given tables.
    pub fn new(patterns: &'a PatternTable, devices: &'a DeviceTable, nets: &'a ResolvedNets) -> Self {
        Self {
            patterns,
            devices,
            nets,
        }
    }

    /// Classifies one requested signal.
    pub fn classify(&self, spec: &SignalSpec) -> Result<Classification, ClassifyError> {
        let key = base_name(&spec.name).to_ascii_uppercase();

        let declared = match (&spec.role, &spec.device) {
            (Some(role), _) => Some(*role),
            (None, Some(device)) => match self.devices.role_of(device) {
                Some(role) => Some(role),
                None => {
                    return Err(ClassifyError::UnknownDevice {
                        name: spec.name.clone(),
                        device: device.clone(),
                    })
                }
            },
            (None, None) => None,
        };

        let mut classification = match declared {
            Some(role) => from_declared(role),
            None => self.classify_by_name(&spec.name, &key)?,
        };

        if classification.class == SignalClass::DigitalIo {
            classification.direction = Some(
                spec.direction
                    .or_else(|| self.infer_direction(&key))
                    .unwrap_or(Direction::Input),
            );
        }
        Ok(classification)
    }

    fn classify_by_name(&self, name: &str, key: &str) -> Result<Classification, ClassifyError> {
        let is_net = |net: &str| net.eq_ignore_ascii_case(key);
        if is_net(&self.nets.digital_vdd)
            || is_net(&self.nets.digital_io_vdd)
            || has_prefix(&self.patterns.digital_power, key)
        {
            return Ok(Classification::new(SignalClass::DigitalPower));
        }
        if is_net(&self.nets.digital_vss)
            || is_net(&self.nets.digital_io_vss)
            || has_prefix(&self.patterns.digital_ground, key)
        {
            return Ok(Classification::new(SignalClass::DigitalGround));
        }

        let power = key.contains("VDD");
        let ground = key.contains("VSS") || key.contains("GND");
        match (power, ground) {
            (true, true) => return Err(ClassifyError::PowerGroundConflict(name.to_string())),
            (true, false) => return Ok(Classification::new(SignalClass::AnalogPower)),
            (false, true) => return Ok(Classification::new(SignalClass::AnalogGround)),
            (false, false) => {}
        }

        if has_prefix(&self.patterns.analog_io, key) {
            return Ok(Classification::new(SignalClass::AnalogIo));
        }
        if self.infer_direction(key).is_some() {
            return Ok(Classification::new(SignalClass::DigitalIo));
        }
        Err(ClassifyError::Unrecognized(name.to_string()))
    }

    /// Direction from the digital prefix tables; the longest match wins and
    /// an input match of equal length beats an output match.
    pub fn infer_direction(&self, key: &str) -> Option<Direction> {
        let input = longest_prefix(&self.patterns.digital_input, key);
        let output = longest_prefix(&self.patterns.digital_output, key);
        match (input, output) {
            (Some(i), Some(o)) if o > i => Some(Direction::Output),
            (Some(_), _) => Some(Direction::Input),
            (None, Some(_)) => Some(Direction::Output),
            (None, None) => None,
        }
    }
}

fn from_declared(role: DeclaredRole) -> Classification {
    use ProviderHint::{ConsumerOnly, Designated};
    match role {
        DeclaredRole::AnalogIo => Classification::new(SignalClass::AnalogIo),
        DeclaredRole::AnalogPower => Classification::new(SignalClass::AnalogPower),
        DeclaredRole::AnalogGround => Classification::new(SignalClass::AnalogGround),
        DeclaredRole::AnalogPowerProvider => {
            Classification::new(SignalClass::AnalogPower).with_hint(Designated)
        }
        DeclaredRole::AnalogPowerConsumer => {
            Classification::new(SignalClass::AnalogPower).with_hint(ConsumerOnly)
        }
        DeclaredRole::AnalogGroundProvider => {
            Classification::new(SignalClass::AnalogGround).with_hint(Designated)
        }
        DeclaredRole::AnalogGroundConsumer => {
            Classification::new(SignalClass::AnalogGround).with_hint(ConsumerOnly)
        }
        DeclaredRole::DigitalIo => Classification::new(SignalClass::DigitalIo),
        DeclaredRole::DigitalPower => Classification::new(SignalClass::DigitalPower),
        DeclaredRole::DigitalGround => Classification::new(SignalClass::DigitalGround),
    }
}

/// Single-letter entries such as `D` or `Q` only match the bare letter or
/// the letter followed by a digit or `_` (`D`, `D3`, `Q_N`); longer entries
/// match any name they start.
fn matches_prefix(prefix: &str, key: &str) -> bool {
    let Some(rest) = key.strip_prefix(prefix) else {
        return false;
    };
    prefix.len() > 1
        || rest
            .chars()
            .next()
            .map_or(true, |c| c.is_ascii_digit() || c == '_')
}

fn has_prefix(table: &[String], key: &str) -> bool {
    table.iter().any(|prefix| matches_prefix(prefix, key))
}

fn longest_prefix(table: &[String], key: &str) -> Option<usize> {
    table
        .iter()
        .filter(|prefix| matches_prefix(prefix, key))
        .map(|prefix| prefix.len())
        .max()
}

/// Classifies every outer signal and inner pad of a requirement.
///
/// Signals that fail classification are reported into `sink` and left out of
/// the table; the caller halts on errors before using it.
pub fn classify_signals(
    requirement: &Requirement,
    classifier: &Classifier<'_>,
    sink: &DiagnosticSink,
) -> SignalTable {
    let _span = tracing::debug_span!("classify").entered();

    let outer = requirement.signals.iter().enumerate().map(|(i, s)| (i, s, None));
    let outer_len = requirement.signals.len();
    let inner = requirement
        .inner_pads
        .iter()
        .enumerate()
        .map(|(i, pad)| (outer_len + i, &pad.signal, Some(pad.position.clone())));

    let mut signals = Vec::with_capacity(requirement.signals.len() + requirement.inner_pads.len());
    let mut outer_count = 0;
    for (raw_index, spec, inner_position) in outer.chain(inner) {
        let id = SignalId::from_index(signals.len());
        let location = match &inner_position {
            Some(position) => ioring_diagnostics::Location::Position(position.clone()),
            None => ioring_diagnostics::Location::signal(raw_index, &spec.name),
        };
        match classifier.classify(spec) {
            Ok(c) => {
                if inner_position.is_none() {
                    outer_count += 1;
                }
                tracing::trace!(signal = %spec.name, class = %c.class, "classified");
                signals.push(Signal {
                    id,
                    name: spec.name.clone(),
                    raw_index,
                    class: c.class,
                    hint: c.hint,
                    direction: c.direction,
                    device: spec.device.clone(),
                    domain: spec.domain.clone(),
                    inner_position,
                });
            }
            Err(err) => sink.emit(diagnostic_for(&err, location)),
        }
    }

    tracing::debug!(count = signals.len(), "signals classified");
    SignalTable::new(signals, outer_count)
}

fn diagnostic_for(err: &ClassifyError, location: ioring_diagnostics::Location) -> Diagnostic {
    match err {
        ClassifyError::Unrecognized(_) => {
            Diagnostic::error(codes::UNCLASSIFIED_SIGNAL, err.to_string(), location)
                .with_help("add a `role` override or extend the `[classifier]` tables")
        }
        ClassifyError::PowerGroundConflict(_) => {
            Diagnostic::error(codes::POWER_GROUND_CONFLICT, err.to_string(), location)
                .with_help("add a `role` override to choose power or ground")
        }
        ClassifyError::UnknownDevice { .. } => {
            Diagnostic::error(codes::UNKNOWN_DEVICE, err.to_string(), location)
                .with_note("device overrides must name an entry of the `[devices]` table")
                .with_help("add a `role` override to use a custom device")
        }
    }
}
