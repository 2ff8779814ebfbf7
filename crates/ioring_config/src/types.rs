//! Requirement types deserialized from a requirement TOML file.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A complete, already-resolved IO-ring requirement.
///
/// The signal list is the user's order; everything else refines how those
/// signals are classified, grouped into voltage domains, and wired.
#[derive(Debug, Clone, Deserialize)]
pub struct Requirement {
    /// Ring geometry and pass-through naming.
    pub ring: RingConfig,
    /// Outer pad signals in the user's order.
    #[serde(default, deserialize_with = "deserialize_signals")]
    pub signals: Vec<SignalSpec>,
    /// Pads inserted between two adjacent outer positions.
    #[serde(default)]
    pub inner_pads: Vec<InnerPadSpec>,
    /// Explicit voltage-domain declarations.
    #[serde(default)]
    pub domains: Vec<DomainDecl>,
    /// Default net names used for wiring.
    #[serde(default)]
    pub nets: NetDefaults,
    /// Device cell names per role.
    #[serde(default)]
    pub devices: DeviceTable,
    /// Additions to the classifier's name-pattern tables.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Requirement {
    /// Creates a requirement with default nets, devices, and patterns.
    pub fn new(ring: RingConfig, signals: Vec<SignalSpec>) -> Self {
        Self {
            ring,
            signals,
            inner_pads: Vec::new(),
            domains: Vec::new(),
            nets: NetDefaults::default(),
            devices: DeviceTable::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Ring geometry, placement direction, and pass-through cell naming.
///
/// Serialized verbatim as the `ring_config` object of the intent graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    /// Pad count on the top and bottom sides.
    pub width: usize,
    /// Pad count on the left and right sides.
    pub height: usize,
    /// Direction in which user-ordered signals are laid around the ring.
    #[serde(default)]
    pub placement_order: PlacementOrder,
    /// Target library for the downstream generators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_name: Option<String>,
    /// Target cell for the downstream generators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_name: Option<String>,
    /// Target view for the downstream generators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_name: Option<String>,
}

impl RingConfig {
    /// Creates a ring with no pass-through names.
    pub fn new(width: usize, height: usize, placement_order: PlacementOrder) -> Self {
        Self {
            width,
            height,
            placement_order,
            library_name: None,
            cell_name: None,
            view_name: None,
        }
    }

    /// Total number of outer pad slots.
    pub fn capacity(&self) -> usize {
        2 * (self.width + self.height)
    }
}

/// The traversal direction used to lay signals around the ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementOrder {
    /// Top, right, bottom, left.
    Clockwise,
    /// Left, bottom, right, top (default).
    #[default]
    Counterclockwise,
}

impl fmt::Display for PlacementOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementOrder::Clockwise => write!(f, "clockwise"),
            PlacementOrder::Counterclockwise => write!(f, "counterclockwise"),
        }
    }
}

/// Direction of a digital IO pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Pad drives the core.
    Input,
    /// Core drives the pad.
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// A role declared explicitly by the user; applied without inference.
///
/// The generic `analog_power`/`analog_ground` roles leave provider selection
/// to the domain resolver, `*_provider` designates the signal's name as the
/// domain provider, and `*_consumer` excludes the signal from provider
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredRole {
    /// Analog signal pad.
    AnalogIo,
    /// Analog supply, provider chosen by the resolver.
    AnalogPower,
    /// Analog return, provider chosen by the resolver.
    AnalogGround,
    /// Analog supply designated as its domain's provider.
    AnalogPowerProvider,
    /// Analog supply that never provides.
    AnalogPowerConsumer,
    /// Analog return designated as its domain's provider.
    AnalogGroundProvider,
    /// Analog return that never provides.
    AnalogGroundConsumer,
    /// Digital signal pad.
    DigitalIo,
    /// Digital supply pad.
    DigitalPower,
    /// Digital return pad.
    DigitalGround,
}

/// One requested pad signal plus optional overrides.
///
/// In TOML a signal is either a bare string or a table with a `name` and any
/// of `role`, `device`, `direction`, and `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignalSpec {
    /// Pad name; may carry a bracketed bus index such as `D<3>`.
    pub name: String,
    /// Explicit role, applied verbatim.
    #[serde(default)]
    pub role: Option<DeclaredRole>,
    /// Explicit device cell base name, without geometry suffix.
    #[serde(default)]
    pub device: Option<String>,
    /// Explicit direction for digital IO.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Explicit voltage-domain group.
    #[serde(default)]
    pub domain: Option<String>,
}

impl SignalSpec {
    /// Creates a signal with no overrides.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            device: None,
            direction: None,
            domain: None,
        }
    }

    /// Sets the declared role.
    pub fn with_role(mut self, role: DeclaredRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets the declared device.
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Sets the declared direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Sets the declared domain group.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignalEntry {
    Bare(String),
    Detailed(SignalSpec),
}

/// Deserializes the signal list, accepting bare names and tables.
///
/// Allows `signals = ["VCM", { name = "CLK", direction = "input" }]`.
fn deserialize_signals<'de, D>(deserializer: D) -> Result<Vec<SignalSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<SignalEntry>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            SignalEntry::Bare(name) => SignalSpec::named(name),
            SignalEntry::Detailed(spec) => spec,
        })
        .collect())
}

/// A pad inserted between two adjacent outer pads of one side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InnerPadSpec {
    /// Target gap, written `side_i_j` with `j == i + 1`.
    pub position: String,
    /// The inserted signal.
    #[serde(flatten)]
    pub signal: SignalSpec,
}

/// An explicit voltage domain, authoritative over the automatic grouping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainDecl {
    /// Domain name used in reports and diagnostics.
    pub name: String,
    /// Member positions (`left_2`, `top_0_1`, ...); must be contiguous in ring order.
    #[serde(default)]
    pub members: Vec<String>,
    /// Name of the supply provider; resolves to its first occurrence among members.
    #[serde(default)]
    pub vdd_provider: Option<String>,
    /// Name of the return provider; resolves to its first occurrence among members.
    #[serde(default)]
    pub vss_provider: Option<String>,
}

/// What to do with a run of analog supplies that lacks a VDD or VSS provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteDomainPolicy {
    /// Report the run as an error (default).
    #[default]
    Error,
    /// Make its members consumers of the nearest complete domain, with a warning.
    AdoptNearest,
}

/// Default net names used by the pin synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetDefaults {
    /// Digital core supply.
    pub digital_vdd: String,
    /// Digital core return.
    pub digital_vss: String,
    /// Digital post-driver supply.
    pub digital_io_vdd: String,
    /// Digital post-driver return.
    pub digital_io_vss: String,
    /// Common ground of analog pads; falls back to `digital_vss`.
    pub common_ground: Option<String>,
    /// Suffix naming a provider's core net.
    pub core_suffix: String,
    /// Handling of incomplete analog domains.
    pub incomplete_domains: IncompleteDomainPolicy,
}

impl Default for NetDefaults {
    fn default() -> Self {
        Self {
            digital_vdd: "VIOL".to_string(),
            digital_vss: "GIOL".to_string(),
            digital_io_vdd: "VIOH".to_string(),
            digital_io_vss: "GIOH".to_string(),
            common_ground: None,
            core_suffix: "_CORE".to_string(),
            incomplete_domains: IncompleteDomainPolicy::Error,
        }
    }
}

/// Device cell names per pad role, plus geometry suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceTable {
    /// Analog signal pad.
    pub analog_io: String,
    /// Analog supply consumer.
    pub analog_power_consumer: String,
    /// Analog return consumer.
    pub analog_ground_consumer: String,
    /// Analog supply provider.
    pub analog_power_provider: String,
    /// Analog return provider.
    pub analog_ground_provider: String,
    /// Digital signal pad.
    pub digital_io: String,
    /// Digital core supply pad.
    pub digital_power: String,
    /// Digital core return pad.
    pub digital_ground: String,
    /// Digital post-driver supply pad.
    pub digital_io_power: String,
    /// Digital post-driver return pad.
    pub digital_io_ground: String,
    /// Corner between two digital pads.
    pub digital_corner: String,
    /// Corner next to any analog or empty slot.
    pub analog_corner: String,
    /// Suffix for pads on the left and right sides.
    pub horizontal_suffix: String,
    /// Suffix for pads on the top and bottom sides.
    pub vertical_suffix: String,
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self {
            analog_io: "PDB3AC".to_string(),
            analog_power_consumer: "PVDD3AC".to_string(),
            analog_ground_consumer: "PVSS3AC".to_string(),
            analog_power_provider: "PVDD3A".to_string(),
            analog_ground_provider: "PVSS3A".to_string(),
            digital_io: "PDDW16SDGZ".to_string(),
            digital_power: "PVDD1DGZ".to_string(),
            digital_ground: "PVSS1DGZ".to_string(),
            digital_io_power: "PVDD2POC".to_string(),
            digital_io_ground: "PVSS2DGZ".to_string(),
            digital_corner: "PCORNER_G".to_string(),
            analog_corner: "PCORNERA_G".to_string(),
            horizontal_suffix: "_H_G".to_string(),
            vertical_suffix: "_V_G".to_string(),
        }
    }
}

impl DeviceTable {
    /// Maps a device name back to the role it implements.
    ///
    /// A trailing geometry suffix is ignored, so both `PVDD3A` and
    /// `PVDD3A_H_G` resolve. Corner devices and unknown names return `None`.
    pub fn role_of(&self, device: &str) -> Option<DeclaredRole> {
        let base = device
            .strip_suffix(self.horizontal_suffix.as_str())
            .or_else(|| device.strip_suffix(self.vertical_suffix.as_str()))
            .unwrap_or(device);
        let table = [
            (&self.analog_io, DeclaredRole::AnalogIo),
            (&self.analog_power_consumer, DeclaredRole::AnalogPowerConsumer),
            (&self.analog_ground_consumer, DeclaredRole::AnalogGroundConsumer),
            (&self.analog_power_provider, DeclaredRole::AnalogPowerProvider),
            (&self.analog_ground_provider, DeclaredRole::AnalogGroundProvider),
            (&self.digital_io, DeclaredRole::DigitalIo),
            (&self.digital_power, DeclaredRole::DigitalPower),
            (&self.digital_ground, DeclaredRole::DigitalGround),
            (&self.digital_io_power, DeclaredRole::DigitalPower),
            (&self.digital_io_ground, DeclaredRole::DigitalGround),
        ];
        table
            .iter()
            .find(|(name, _)| name.as_str() == base)
            .map(|&(_, role)| role)
    }
}

/// User additions to the classifier's name-pattern tables.
///
/// Pattern entries are name prefixes compared against the upper-cased base
/// name (bus index removed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Prefixes of analog signal pads.
    pub analog_io: Vec<String>,
    /// Prefixes of digital inputs (control, clock).
    pub digital_input: Vec<String>,
    /// Prefixes of digital outputs (data, status).
    pub digital_output: Vec<String>,
    /// Prefixes of digital supply pads.
    pub digital_power: Vec<String>,
    /// Prefixes of digital return pads.
    pub digital_ground: Vec<String>,
    /// Rules mapping name fragments to voltage-domain groups.
    pub groups: Vec<GroupRule>,
    /// Use only the user tables, dropping the built-in ones.
    pub replace_defaults: bool,
}

/// A rule assigning analog supplies to a voltage-domain group by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupRule {
    /// Name fragment to look for.
    pub key: String,
    /// Group assigned on match.
    pub group: String,
    /// Where in the name the key must appear.
    #[serde(default, rename = "match")]
    pub match_kind: MatchKind,
}

/// How a [`GroupRule`] key is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Name starts with the key.
    Prefix,
    /// Name ends with the key.
    Suffix,
    /// Name contains the key anywhere (default).
    #[default]
    Substring,
}

impl MatchKind {
    /// Returns `true` if `name` matches `key` under this kind.
    pub fn matches(self, name: &str, key: &str) -> bool {
        match self {
            MatchKind::Prefix => name.starts_with(key),
            MatchKind::Suffix => name.ends_with(key),
            MatchKind::Substring => name.contains(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_requirement_from_str;

    #[test]
    fn mixed_signal_entries() {
        let toml = r#"
signals = ["VCM", { name = "CLK", role = "digital_io", direction = "input" }]

[ring]
width = 1
height = 1
"#;
        let req = load_requirement_from_str(toml).unwrap();
        assert_eq!(req.signals[0], SignalSpec::named("VCM"));
        assert_eq!(req.signals[1].role, Some(DeclaredRole::DigitalIo));
        assert_eq!(req.signals[1].direction, Some(Direction::Input));
    }

    #[test]
    fn declared_role_all_variants() {
        for (input, expected) in [
            ("analog_io", DeclaredRole::AnalogIo),
            ("analog_power", DeclaredRole::AnalogPower),
            ("analog_ground", DeclaredRole::AnalogGround),
            ("analog_power_provider", DeclaredRole::AnalogPowerProvider),
            ("analog_power_consumer", DeclaredRole::AnalogPowerConsumer),
            ("analog_ground_provider", DeclaredRole::AnalogGroundProvider),
            ("analog_ground_consumer", DeclaredRole::AnalogGroundConsumer),
            ("digital_io", DeclaredRole::DigitalIo),
            ("digital_power", DeclaredRole::DigitalPower),
            ("digital_ground", DeclaredRole::DigitalGround),
        ] {
            let toml = format!(
                r#"
signals = [{{ name = "X", role = "{input}" }}]

[ring]
width = 1
height = 0
"#
            );
            let req = load_requirement_from_str(&toml).unwrap();
            assert_eq!(req.signals[0].role, Some(expected));
        }
    }

    #[test]
    fn inner_pad_flattened_signal() {
        let toml = r#"
signals = ["A", "B"]

[ring]
width = 0
height = 1

[[inner_pads]]
position = "left_0_1"
name = "VREF"
role = "analog_io"
"#;
        let req = load_requirement_from_str(toml).unwrap();
        assert_eq!(req.inner_pads[0].position, "left_0_1");
        assert_eq!(req.inner_pads[0].signal.name, "VREF");
        assert_eq!(req.inner_pads[0].signal.role, Some(DeclaredRole::AnalogIo));
    }

    #[test]
    fn placement_order_serializes_lowercase() {
        let ring = RingConfig::new(2, 3, PlacementOrder::Clockwise);
        let json = serde_json::to_string(&ring).unwrap();
        assert_eq!(
            json,
            r#"{"width":2,"height":3,"placement_order":"clockwise"}"#
        );
    }

    #[test]
    fn device_reverse_lookup() {
        let devices = DeviceTable::default();
        assert_eq!(devices.role_of("PVDD3A"), Some(DeclaredRole::AnalogPowerProvider));
        assert_eq!(devices.role_of("PVSS3AC_V_G"), Some(DeclaredRole::AnalogGroundConsumer));
        assert_eq!(devices.role_of("PVDD2POC_H_G"), Some(DeclaredRole::DigitalPower));
        assert_eq!(devices.role_of("PCORNER_G"), None);
        assert_eq!(devices.role_of("NOPE"), None);
    }

    #[test]
    fn group_rule_match_kinds() {
        assert!(MatchKind::Prefix.matches("SAR_VDD", "SAR"));
        assert!(!MatchKind::Prefix.matches("VDD_SAR", "SAR"));
        assert!(MatchKind::Suffix.matches("VDD_SAR", "SAR"));
        assert!(MatchKind::Substring.matches("AVDD_SAR_1", "SAR"));
    }

    #[test]
    fn ring_capacity() {
        assert_eq!(RingConfig::new(4, 3, PlacementOrder::default()).capacity(), 14);
    }
}
