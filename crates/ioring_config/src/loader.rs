//! Requirement file loading and validation.

use crate::error::ConfigError;
use crate::types::Requirement;
use std::path::Path;

/// Loads and validates a requirement TOML file.
pub fn load_requirement(path: &Path) -> Result<Requirement, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_requirement_from_str(&content)
}

/// Parses and validates a requirement from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_requirement_from_str(content: &str) -> Result<Requirement, ConfigError> {
    let requirement: Requirement =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_requirement(&requirement)?;
    Ok(requirement)
}

/// Validates shape-level constraints that do not need the compiler.
///
/// Structural problems that depend on classification or placement (domain
/// contiguity, inner pad gaps) are reported later as diagnostics.
pub fn validate_requirement(requirement: &Requirement) -> Result<(), ConfigError> {
    if requirement.ring.width == 0 && requirement.ring.height == 0 {
        return Err(ConfigError::ValidationError(
            "ring width and height are both zero".to_string(),
        ));
    }
    for (i, signal) in requirement.signals.iter().enumerate() {
        if signal.name.trim().is_empty() {
            return Err(ConfigError::MissingField(format!("signals[{i}].name")));
        }
    }
    for (i, pad) in requirement.inner_pads.iter().enumerate() {
        if pad.signal.name.trim().is_empty() {
            return Err(ConfigError::MissingField(format!("inner_pads[{i}].name")));
        }
    }
    if requirement.nets.core_suffix.is_empty() {
        return Err(ConfigError::MissingField("nets.core_suffix".to_string()));
    }
    for (i, domain) in requirement.domains.iter().enumerate() {
        if domain.name.trim().is_empty() {
            return Err(ConfigError::MissingField(format!("domains[{i}].name")));
        }
        if domain.members.is_empty() {
            return Err(ConfigError::MissingField(format!("domains[{i}].members")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IncompleteDomainPolicy, MatchKind, PlacementOrder};
    use std::io::Write;

    #[test]
    fn parse_minimal_requirement() {
        let toml = r#"
signals = ["VCM", "AVDD", "AVSS"]

[ring]
width = 0
height = 3
"#;
        let req = load_requirement_from_str(toml).unwrap();
        assert_eq!(req.ring.height, 3);
        assert_eq!(req.ring.placement_order, PlacementOrder::Counterclockwise);
        assert_eq!(req.signals.len(), 3);
        assert!(req.inner_pads.is_empty());
        assert!(req.domains.is_empty());
    }

    #[test]
    fn parse_full_requirement() {
        let toml = r#"
signals = [
  "VCM",
  { name = "AVDD_IB", role = "analog_power_provider" },
  { name = "D<0>", device = "PDDW16SDGZ" },
  { name = "IBIAS", domain = "IB" },
]

[ring]
width = 2
height = 2
placement_order = "clockwise"
library_name = "LLM_Layout_Design"
cell_name = "IO_RING"
view_name = "schematic"

[[inner_pads]]
position = "left_0_1"
name = "VREF"

[[domains]]
name = "IB"
members = ["top_0", "top_1"]
vdd_provider = "AVDD_IB"

[nets]
common_ground = "VSS_COMMON"
incomplete_domains = "adopt_nearest"

[devices]
analog_io = "PDB3AC_X"

[classifier]
analog_io = ["VSENSE"]

[[classifier.groups]]
key = "_IB"
group = "IB"
match = "suffix"
"#;
        let req = load_requirement_from_str(toml).unwrap();
        assert_eq!(req.ring.placement_order, PlacementOrder::Clockwise);
        assert_eq!(req.ring.cell_name.as_deref(), Some("IO_RING"));
        assert_eq!(req.signals.len(), 4);
        assert_eq!(req.inner_pads.len(), 1);
        assert_eq!(req.domains[0].vdd_provider.as_deref(), Some("AVDD_IB"));
        assert_eq!(req.domains[0].vss_provider, None);
        assert_eq!(req.nets.common_ground.as_deref(), Some("VSS_COMMON"));
        assert_eq!(req.nets.digital_vss, "GIOL");
        assert_eq!(
            req.nets.incomplete_domains,
            IncompleteDomainPolicy::AdoptNearest
        );
        assert_eq!(req.devices.analog_io, "PDB3AC_X");
        assert_eq!(req.devices.analog_power_provider, "PVDD3A");
        assert_eq!(req.classifier.groups[0].match_kind, MatchKind::Suffix);
    }

    #[test]
    fn empty_ring_errors() {
        let toml = r#"
[ring]
width = 0
height = 0
"#;
        let err = load_requirement_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_signal_name_errors() {
        let toml = r#"
signals = ["VCM", ""]

[ring]
width = 1
height = 1
"#;
        let err = load_requirement_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "signals[1].name"));
    }

    #[test]
    fn domain_without_members_errors() {
        let toml = r#"
[ring]
width = 1
height = 1

[[domains]]
name = "SAR"
"#;
        let err = load_requirement_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "domains[0].members"));
    }

    #[test]
    fn empty_core_suffix_errors() {
        let toml = r#"
[ring]
width = 1
height = 1

[nets]
core_suffix = ""
"#;
        let err = load_requirement_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_requirement_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "signals = [\"CLK\"]\n[ring]\nwidth = 1\nheight = 0").unwrap();
        let req = load_requirement(file.path()).unwrap();
        assert_eq!(req.signals[0].name, "CLK");
    }

    #[test]
    fn io_error_from_missing_file() {
        let err = load_requirement(Path::new("/nonexistent/ring.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
