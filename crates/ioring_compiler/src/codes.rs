//! Diagnostic codes emitted by the compiler stages.
//!
//! The hundreds digit names the stage: 1xx classification, 2xx voltage
//! domains, 3xx placement, 4xx pin synthesis.

use ioring_diagnostics::{Category, DiagnosticCode};

/// No override and no name pattern classifies the signal.
pub const UNCLASSIFIED_SIGNAL: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
/// The name matches both a supply and a return pattern.
pub const POWER_GROUND_CONFLICT: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
/// A device override names a device absent from the device table.
pub const UNKNOWN_DEVICE: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);

/// Declared domain members are not contiguous in ring order.
pub const DOMAIN_NOT_CONTIGUOUS: DiagnosticCode = DiagnosticCode::new(Category::Error, 201);
/// A domain lacks a supply or return provider.
pub const DOMAIN_INCOMPLETE: DiagnosticCode = DiagnosticCode::new(Category::Error, 202);
/// Two equally specific group rules disagree.
pub const AMBIGUOUS_GROUP: DiagnosticCode = DiagnosticCode::new(Category::Error, 203);
/// A declared member position is malformed or unoccupied.
pub const UNKNOWN_MEMBER_POSITION: DiagnosticCode = DiagnosticCode::new(Category::Error, 204);
/// A declared member is a digital pad.
pub const DIGITAL_DOMAIN_MEMBER: DiagnosticCode = DiagnosticCode::new(Category::Error, 205);
/// Two declared domains claim the same pad.
pub const OVERLAPPING_DOMAINS: DiagnosticCode = DiagnosticCode::new(Category::Error, 206);
/// A declared provider name is not among the domain's members.
pub const UNKNOWN_PROVIDER: DiagnosticCode = DiagnosticCode::new(Category::Error, 207);
/// An analog IO names a domain that does not exist.
pub const UNKNOWN_DOMAIN: DiagnosticCode = DiagnosticCode::new(Category::Error, 208);
/// An analog IO has no domain to reference.
pub const ORPHAN_ANALOG_IO: DiagnosticCode = DiagnosticCode::new(Category::Error, 209);

/// More signals than outer ring slots.
pub const RING_OVERFLOW: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);
/// Inner pad indices are not adjacent and ascending.
pub const INNER_NOT_ADJACENT: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);
/// Inner pad gap lies outside the occupied part of its side.
pub const INNER_OUT_OF_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);
/// Two inner pads target the same gap.
pub const INNER_GAP_TAKEN: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);
/// Inner position string does not parse as `side_i_j`.
pub const INNER_MALFORMED: DiagnosticCode = DiagnosticCode::new(Category::Error, 305);

/// An incomplete run was adopted by the nearest complete domain.
pub const DOMAIN_ADOPTED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);
/// An extra provider designation was demoted to consumer.
pub const PROVIDER_DEMOTED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 202);
/// The ring has empty outer slots.
pub const RING_UNDERFILLED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);

/// The common ground label equals a domain's ground reference label.
pub const GROUND_LABEL_COLLISION: DiagnosticCode = DiagnosticCode::new(Category::Config, 401);

#[cfg(test)]
mod tests {
    use super::*;

    use ioring_diagnostics::Stage;

    #[test]
    fn stages_match_owning_pass() {
        assert_eq!(POWER_GROUND_CONFLICT.stage(), Some(Stage::Classification));
        assert_eq!(AMBIGUOUS_GROUP.stage(), Some(Stage::Domains));
        assert_eq!(PROVIDER_DEMOTED.stage(), Some(Stage::Domains));
        assert_eq!(RING_OVERFLOW.stage(), Some(Stage::Placement));
        assert_eq!(GROUND_LABEL_COLLISION.stage(), Some(Stage::Pins));
    }

    #[test]
    fn stage_numbering() {
        assert_eq!(UNCLASSIFIED_SIGNAL.to_string(), "E101");
        assert_eq!(DOMAIN_INCOMPLETE.to_string(), "E202");
        assert_eq!(INNER_NOT_ADJACENT.to_string(), "E302");
        assert_eq!(PROVIDER_DEMOTED.to_string(), "W202");
        assert_eq!(GROUND_LABEL_COLLISION.to_string(), "C401");
    }
}
