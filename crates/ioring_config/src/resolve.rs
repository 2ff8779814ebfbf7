//! Resolution of classifier pattern tables and default net names.
//!
//! The built-in tables are the baseline; user tables are placed in front of
//! them (or replace them when `replace_defaults` is set). All keys are
//! upper-cased once here so the classifier compares names case-insensitively.

use crate::types::{ClassifierConfig, GroupRule, IncompleteDomainPolicy, NetDefaults};

const ANALOG_IO: &[&str] = &[
    "VCM", "VREF", "VIN", "VIP", "VOUT", "VBIAS", "IBIAS", "IREF", "IB", "AIN", "AOUT", "VCTRL",
    "VTUNE",
];

const DIGITAL_INPUT: &[&str] = &[
    "CLK", "RST", "RESET", "EN", "SEL", "CS", "SCK", "SCLK", "SDI", "DIN", "MOSI", "CTRL", "CFG",
    "TRIG", "START", "WE", "LOAD", "MODE",
];

const DIGITAL_OUTPUT: &[&str] = &[
    "D", "DOUT", "DATA", "DO", "Q", "SDO", "MISO", "OUT", "FLAG", "READY", "RDY", "DONE", "VALID",
    "BUSY",
];

const DIGITAL_POWER: &[&str] = &["DVDD", "VDDIO", "IOVDD"];

const DIGITAL_GROUND: &[&str] = &["DVSS", "VSSIO", "IOVSS", "DGND"];

/// The effective name-pattern tables used by the classifier and the domain
/// resolver. Every entry is upper-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    /// Prefixes of analog signal pads.
    pub analog_io: Vec<String>,
    /// Prefixes of digital inputs.
    pub digital_input: Vec<String>,
    /// Prefixes of digital outputs.
    pub digital_output: Vec<String>,
    /// Prefixes of digital supply pads.
    pub digital_power: Vec<String>,
    /// Prefixes of digital return pads.
    pub digital_ground: Vec<String>,
    /// Voltage-domain group rules, user order.
    pub groups: Vec<GroupRule>,
}

impl Default for PatternTable {
    fn default() -> Self {
        resolve_patterns(&ClassifierConfig::default())
    }
}

/// Merges the user's classifier configuration with the built-in tables.
pub fn resolve_patterns(config: &ClassifierConfig) -> PatternTable {
    let merge = |user: &[String], builtin: &[&str]| -> Vec<String> {
        let mut merged: Vec<String> = user.iter().map(|p| p.to_ascii_uppercase()).collect();
        if !config.replace_defaults {
            for entry in builtin {
                if !merged.iter().any(|m| m == entry) {
                    merged.push((*entry).to_string());
                }
            }
        }
        merged
    };

    PatternTable {
        analog_io: merge(&config.analog_io, ANALOG_IO),
        digital_input: merge(&config.digital_input, DIGITAL_INPUT),
        digital_output: merge(&config.digital_output, DIGITAL_OUTPUT),
        digital_power: merge(&config.digital_power, DIGITAL_POWER),
        digital_ground: merge(&config.digital_ground, DIGITAL_GROUND),
        groups: config
            .groups
            .iter()
            .map(|rule| GroupRule {
                key: rule.key.to_ascii_uppercase(),
                group: rule.group.clone(),
                match_kind: rule.match_kind,
            })
            .collect(),
    }
}

/// Net names with every fallback applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNets {
    /// Digital core supply.
    pub digital_vdd: String,
    /// Digital core return.
    pub digital_vss: String,
    /// Digital post-driver supply.
    pub digital_io_vdd: String,
    /// Digital post-driver return.
    pub digital_io_vss: String,
    /// Common ground of analog pads.
    pub common_ground: String,
    /// Suffix naming a provider's core net.
    pub core_suffix: String,
    /// Handling of incomplete analog domains.
    pub incomplete_domains: IncompleteDomainPolicy,
}

impl Default for ResolvedNets {
    fn default() -> Self {
        resolve_nets(&NetDefaults::default())
    }
}

/// Applies fallbacks to the user's net defaults.
///
/// The common ground falls back to the digital core return, so an unset
/// `common_ground` follows a renamed `digital_vss`.
pub fn resolve_nets(nets: &NetDefaults) -> ResolvedNets {
    ResolvedNets {
        digital_vdd: nets.digital_vdd.clone(),
        digital_vss: nets.digital_vss.clone(),
        digital_io_vdd: nets.digital_io_vdd.clone(),
        digital_io_vss: nets.digital_io_vss.clone(),
        common_ground: nets
            .common_ground
            .clone()
            .unwrap_or_else(|| nets.digital_vss.clone()),
        core_suffix: nets.core_suffix.clone(),
        incomplete_domains: nets.incomplete_domains,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchKind;

    #[test]
    fn builtin_tables_present() {
        let table = PatternTable::default();
        assert!(table.analog_io.contains(&"VCM".to_string()));
        assert!(table.digital_input.contains(&"CLK".to_string()));
        assert!(table.digital_output.contains(&"DOUT".to_string()));
        assert!(table.groups.is_empty());
    }

    #[test]
    fn user_entries_first_and_uppercased() {
        let config = ClassifierConfig {
            analog_io: vec!["vsense".into()],
            ..Default::default()
        };
        let table = resolve_patterns(&config);
        assert_eq!(table.analog_io[0], "VSENSE");
        assert!(table.analog_io.contains(&"VREF".to_string()));
    }

    #[test]
    fn duplicate_user_entry_not_repeated() {
        let config = ClassifierConfig {
            digital_input: vec!["clk".into()],
            ..Default::default()
        };
        let table = resolve_patterns(&config);
        assert_eq!(table.digital_input.iter().filter(|p| *p == "CLK").count(), 1);
    }

    #[test]
    fn replace_defaults_drops_builtins() {
        let config = ClassifierConfig {
            analog_io: vec!["X".into()],
            replace_defaults: true,
            ..Default::default()
        };
        let table = resolve_patterns(&config);
        assert_eq!(table.analog_io, vec!["X".to_string()]);
        assert!(table.digital_input.is_empty());
    }

    #[test]
    fn group_keys_uppercased() {
        let config = ClassifierConfig {
            groups: vec![GroupRule {
                key: "_ib".into(),
                group: "IB".into(),
                match_kind: MatchKind::Suffix,
            }],
            ..Default::default()
        };
        assert_eq!(resolve_patterns(&config).groups[0].key, "_IB");
    }

    #[test]
    fn common_ground_falls_back_to_digital_vss() {
        let nets = NetDefaults {
            digital_vss: "DGND0".into(),
            ..Default::default()
        };
        assert_eq!(resolve_nets(&nets).common_ground, "DGND0");
        assert_eq!(ResolvedNets::default().common_ground, "GIOL");
    }

    #[test]
    fn explicit_common_ground_wins() {
        let nets = NetDefaults {
            common_ground: Some("VSS_RING".into()),
            ..Default::default()
        };
        assert_eq!(resolve_nets(&nets).common_ground, "VSS_RING");
    }
}
