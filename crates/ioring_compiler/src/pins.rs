//! Device selection and pin-connection synthesis.
//!
//! Every placed pad gets a device from the device table (or the user's
//! override) plus the geometry suffix of its side, and a fixed pin map for
//! its role. Analog pins reference the providers of the pad's voltage
//! domain; digital pins reference the four digital supply nets.

use crate::codes;
use crate::domain::{DomainMap, VoltageDomain};
use crate::graph::{Instance, InstanceKind, PinConnection, PinMap};
use crate::placement::{Placement, Position, Side};
use crate::signal::{Role, Signal, SignalTable};
use ioring_common::{base_name, with_core_suffix, InternalError, IoRingResult};
use ioring_config::{DeclaredRole, DeviceTable, ResolvedNets};
use ioring_diagnostics::{Diagnostic, DiagnosticSink, Label, Location};

/// Analog signal pin.
pub const AIO: &str = "AIO";
/// Analog supply pin.
pub const AVDD: &str = "AVDD";
/// Analog return pin.
pub const AVSS: &str = "AVSS";
/// Consumer reference to the domain supply provider.
pub const TACVDD: &str = "TACVDD";
/// Consumer reference to the domain return provider.
pub const TACVSS: &str = "TACVSS";
/// Provider supply terminal.
pub const TAVDD: &str = "TAVDD";
/// Provider return terminal.
pub const TAVSS: &str = "TAVSS";
/// Digital core supply.
pub const VDD: &str = "VDD";
/// Common or digital core return.
pub const VSS: &str = "VSS";
/// Digital post-driver supply.
pub const VDDPST: &str = "VDDPST";
/// Digital post-driver return.
pub const VSSPST: &str = "VSSPST";

/// Builds pin maps and device names for placed pads.
pub struct PinSynthesizer<'a> {
    signals: &'a SignalTable,
    domains: &'a DomainMap,
    devices: &'a DeviceTable,
    nets: &'a ResolvedNets,
}

fn pin_map(entries: &[(&str, &str)]) -> PinMap {
    entries
        .iter()
        .map(|(pin, net)| (pin.to_string(), PinConnection::new(*net)))
        .collect()
}

impl<'a> PinSynthesizer<'a> {
    /// Creates a synthesizer over resolved signals and domains.
    pub fn new(
        signals: &'a SignalTable,
        domains: &'a DomainMap,
        devices: &'a DeviceTable,
        nets: &'a ResolvedNets,
    ) -> Self {
        Self {
            signals,
            domains,
            devices,
            nets,
        }
    }

    fn domain(&self, signal: &Signal) -> IoRingResult<&'a VoltageDomain> {
        self.domains.domain_of(signal.id).ok_or_else(|| {
            InternalError::new(format!(
                "analog pad '{}' reached pin synthesis without a voltage domain",
                signal.name
            ))
        })
    }

    fn provider_names(&self, domain: &VoltageDomain) -> (&'a str, &'a str) {
        let signals: &'a SignalTable = self.signals;
        (
            signals.get(domain.vdd_provider).name.as_str(),
            signals.get(domain.vss_provider).name.as_str(),
        )
    }

    /// The pin map of one pad.
    pub fn pins(&self, signal: &Signal, role: Role) -> IoRingResult<PinMap> {
        let name = signal.name.as_str();
        let common = self.nets.common_ground.as_str();
        let map = match role {
            Role::AnalogIo | Role::AnalogPowerConsumer | Role::AnalogGroundConsumer => {
                let (vdd, vss) = self.provider_names(self.domain(signal)?);
                let own = match role {
                    Role::AnalogIo => AIO,
                    Role::AnalogPowerConsumer => AVDD,
                    _ => AVSS,
                };
                pin_map(&[(own, name), (TACVSS, vss), (TACVDD, vdd), (VSS, common)])
            }
            Role::AnalogPowerProvider => {
                let (_, vss) = self.provider_names(self.domain(signal)?);
                let core = with_core_suffix(name, &self.nets.core_suffix);
                pin_map(&[(AVDD, core.as_str()), (TAVDD, name), (TAVSS, vss), (VSS, common)])
            }
            Role::AnalogGroundProvider => {
                let (vdd, _) = self.provider_names(self.domain(signal)?);
                let core = with_core_suffix(name, &self.nets.core_suffix);
                pin_map(&[(AVSS, core.as_str()), (TAVSS, name), (TAVDD, vdd), (VSS, common)])
            }
            Role::DigitalIo | Role::DigitalPower | Role::DigitalGround => pin_map(&[
                (VDD, self.nets.digital_vdd.as_str()),
                (VSS, self.nets.digital_vss.as_str()),
                (VDDPST, self.nets.digital_io_vdd.as_str()),
                (VSSPST, self.nets.digital_io_vss.as_str()),
            ]),
        };
        Ok(map)
    }

    /// The device base name of one pad, without geometry suffix.
    ///
    /// A device override is kept unless the table assigns it a different
    /// role than the pad resolved to, e.g. a provider cell on a pad demoted
    /// to consumer. Such a pad gets its role's table device, so the device
    /// always has the pins of its pin map.
    pub fn device_base(&self, signal: &Signal, role: Role) -> String {
        if let Some(device) = &signal.device {
            let fits = self
                .devices
                .role_of(device)
                .map_or(true, |declared| device_fits(declared, role));
            if fits {
                return self.strip_suffix(device).to_string();
            }
            tracing::debug!(
                signal = %signal.name,
                device = %device,
                ?role,
                "device override replaced by role device"
            );
        }
        let devices = self.devices;
        let is_net = |net: &str| base_name(&signal.name).eq_ignore_ascii_case(net);
        let device = match role {
            Role::AnalogIo => &devices.analog_io,
            Role::AnalogPowerConsumer => &devices.analog_power_consumer,
            Role::AnalogPowerProvider => &devices.analog_power_provider,
            Role::AnalogGroundConsumer => &devices.analog_ground_consumer,
            Role::AnalogGroundProvider => &devices.analog_ground_provider,
            Role::DigitalIo => &devices.digital_io,
            Role::DigitalPower if is_net(&self.nets.digital_io_vdd) => &devices.digital_io_power,
            Role::DigitalPower => &devices.digital_power,
            Role::DigitalGround if is_net(&self.nets.digital_io_vss) => &devices.digital_io_ground,
            Role::DigitalGround => &devices.digital_ground,
        };
        device.clone()
    }

    fn strip_suffix<'d>(&self, device: &'d str) -> &'d str {
        device
            .strip_suffix(self.devices.horizontal_suffix.as_str())
            .or_else(|| device.strip_suffix(self.devices.vertical_suffix.as_str()))
            .unwrap_or(device)
    }

    /// Geometry suffix for pads on `side`.
    pub fn suffix(&self, side: Side) -> &str {
        if side.is_vertical_edge() {
            &self.devices.horizontal_suffix
        } else {
            &self.devices.vertical_suffix
        }
    }

    /// Builds the pad and inner pad instances in final order.
    pub fn instances(&self, placement: &Placement) -> IoRingResult<Vec<Instance>> {
        let _span = tracing::debug_span!("pins").entered();
        placement
            .pads
            .iter()
            .map(|pad| {
                let signal = self.signals.get(pad.signal);
                let role = self.domains.role_of(signal);
                let (side, kind) = match pad.position {
                    Position::Pad { side, .. } => (side, InstanceKind::Pad),
                    Position::InnerPad { side, .. } => (side, InstanceKind::InnerPad),
                    Position::Corner(_) => {
                        return Err(InternalError::new(format!(
                            "pad '{}' placed on corner slot {}",
                            signal.name, pad.position
                        )))
                    }
                };
                let device = format!("{}{}", self.device_base(signal, role), self.suffix(side));
                Ok(Instance {
                    name: signal.name.clone(),
                    device,
                    position: pad.position,
                    kind,
                    direction: if role == Role::DigitalIo {
                        signal.direction
                    } else {
                        None
                    },
                    pin_connections: self.pins(signal, role)?,
                })
            })
            .collect()
    }
}

fn device_fits(declared: DeclaredRole, role: Role) -> bool {
    match declared {
        DeclaredRole::AnalogIo => role == Role::AnalogIo,
        DeclaredRole::AnalogPowerProvider => role == Role::AnalogPowerProvider,
        DeclaredRole::AnalogPowerConsumer => role == Role::AnalogPowerConsumer,
        DeclaredRole::AnalogGroundProvider => role == Role::AnalogGroundProvider,
        DeclaredRole::AnalogGroundConsumer => role == Role::AnalogGroundConsumer,
        DeclaredRole::AnalogPower => {
            matches!(role, Role::AnalogPowerProvider | Role::AnalogPowerConsumer)
        }
        DeclaredRole::AnalogGround => {
            matches!(role, Role::AnalogGroundProvider | Role::AnalogGroundConsumer)
        }
        DeclaredRole::DigitalIo => role == Role::DigitalIo,
        DeclaredRole::DigitalPower => role == Role::DigitalPower,
        DeclaredRole::DigitalGround => role == Role::DigitalGround,
    }
}

/// Reports domains whose return provider label equals the common ground.
///
/// The provider's `TAVSS` net and every pad's `VSS` pin would then share one
/// label, shorting the domain reference to the common ground.
pub fn check_ground_collisions(
    domains: &DomainMap,
    signals: &SignalTable,
    nets: &ResolvedNets,
    sink: &DiagnosticSink,
) {
    for domain in domains.domains() {
        let provider = signals.get(domain.vss_provider);
        if provider.name == nets.common_ground {
            sink.emit(
                Diagnostic::warning(
                    codes::GROUND_LABEL_COLLISION,
                    format!(
                        "ground reference '{}' of domain '{}' equals the common ground label",
                        provider.name, domain.name
                    ),
                    Location::Domain(domain.name.clone()),
                )
                .with_label(Label::primary(provider.location(), "return provider"))
                .with_label(Label::secondary(
                    Location::Config("nets.common_ground".into()),
                    "common ground",
                ))
                .with_help("rename the return pad or set `nets.common_ground`"),
            );
        }
    }
}
