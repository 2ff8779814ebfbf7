//! The intent graph: ring configuration plus ordered instances.
//!
//! This is the compiler's only output artifact. Serialization is stable:
//! struct fields serialize in declaration order and pin maps are sorted, so
//! equal graphs produce byte-identical JSON and equal fingerprints.

use crate::corner::{splice_order, Corner};
use crate::placement::{Position, Side};
use crate::stats::GraphStats;
use ioring_common::{ContentHash, InternalError, IoRingResult};
use ioring_config::{Direction, PlacementOrder, RingConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A net label attached to a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConnection {
    /// Net name.
    pub label: String,
}

impl PinConnection {
    /// Creates a connection to `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Pin name to connection, sorted by pin name.
pub type PinMap = BTreeMap<String, PinConnection>;

/// What kind of cell an instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceKind {
    /// Outer ring pad.
    Pad,
    /// Pad between two outer pads.
    InnerPad,
    /// Corner cell.
    Corner,
}

/// One cell of the ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name; the signal name for pads.
    pub name: String,
    /// Device name including geometry suffix.
    pub device: String,
    /// Ring position.
    pub position: Position,
    /// Cell kind.
    #[serde(rename = "type")]
    pub kind: InstanceKind,
    /// Direction of digital IO pads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Pin connections; empty and omitted for corners.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pin_connections: PinMap,
}

impl Instance {
    /// A corner instance.
    pub fn corner(corner: &Corner) -> Self {
        Self {
            name: corner.slot.instance_name().to_string(),
            device: corner.device.clone(),
            position: Position::Corner(corner.slot),
            kind: InstanceKind::Corner,
            direction: None,
            pin_connections: PinMap::new(),
        }
    }
}

/// The compiled ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentGraph {
    /// Geometry, traversal direction, and pass-through names.
    pub ring_config: RingConfig,
    /// Cells in traversal order with corners spliced in.
    pub instances: Vec<Instance>,
}

impl IntentGraph {
    /// Pretty-printed canonical JSON.
    pub fn to_json(&self) -> IoRingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a graph from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Content hash of the canonical JSON.
    pub fn fingerprint(&self) -> IoRingResult<ContentHash> {
        Ok(ContentHash::from_str_content(&self.to_json()?))
    }

    /// Pads and inner pads of one side, re-derived from their positions.
    ///
    /// Instances are ordered by outer index with an inner pad right after
    /// the outer pad it follows, which is the side's traversal order.
    pub fn side_instances(&self, side: Side) -> Vec<&Instance> {
        let mut on_side: Vec<&Instance> = self
            .instances
            .iter()
            .filter(|i| i.position.side() == Some(side))
            .collect();
        on_side.sort_by_key(|i| i.position.side_order_key());
        on_side
    }

    /// Pads and inner pads of every side, in `ring_config.placement_order`.
    pub fn traversal_pads(&self) -> Vec<&Instance> {
        crate::placement::traversal(self.ring_config.placement_order)
            .into_iter()
            .flat_map(|side| self.side_instances(side))
            .collect()
    }

    /// The corner instances.
    pub fn corners(&self) -> impl Iterator<Item = &Instance> {
        self.instances
            .iter()
            .filter(|i| i.kind == InstanceKind::Corner)
    }

    /// Summary statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats::from_graph(self)
    }

    /// The traversal direction.
    pub fn placement_order(&self) -> PlacementOrder {
        self.ring_config.placement_order
    }
}

/// Splices corners into the pad instances and wraps them with the ring
/// configuration.
///
/// `pads` must be in final traversal order; each corner follows the last
/// instance of the side preceding it.
pub fn assemble(ring: &RingConfig, pads: Vec<Instance>, corners: &[Corner]) -> IoRingResult<IntentGraph> {
    let _span = tracing::debug_span!("assemble").entered();
    let mut instances = Vec::with_capacity(pads.len() + corners.len());
    let mut pads = pads.into_iter().peekable();
    for (side, slot) in splice_order(ring.placement_order) {
        while let Some(pad) = pads.next_if(|p| p.position.side() == Some(side)) {
            instances.push(pad);
        }
        let corner = corners
            .iter()
            .find(|c| c.slot == slot)
            .ok_or_else(|| InternalError::new(format!("corner {} not resolved", slot.as_str())))?;
        instances.push(Instance::corner(corner));
    }
    if let Some(stray) = pads.next() {
        return Err(InternalError::new(format!(
            "pad '{}' at {} is out of traversal order",
            stray.name, stray.position
        )));
    }
    Ok(IntentGraph {
        ring_config: ring.clone(),
        instances,
    })
}
