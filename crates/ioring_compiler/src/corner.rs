//! Corner resolution.
//!
//! Each corner slot sits between the last pad of one side and the first pad
//! of the next, in traversal order. A corner is digital only when both of
//! those neighbours are digital pads; an analog or empty neighbour makes it
//! an analog corner.

use crate::ids::SignalId;
use crate::placement::{CornerSlot, Placement, Position, Side};
use crate::signal::SignalTable;
use ioring_config::{DeviceTable, PlacementOrder, RingConfig};

/// Which end of a side a corner touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// Index 0.
    First,
    /// Index `capacity - 1`.
    Last,
}

/// Corner cell flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerKind {
    /// Both neighbours are digital.
    Digital,
    /// Any other neighbourhood.
    Analog,
}

/// A resolved corner cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corner {
    /// Slot on the ring.
    pub slot: CornerSlot,
    /// Flavor.
    pub kind: CornerKind,
    /// Device name, without geometry suffix.
    pub device: String,
    /// The two neighbouring pads, `None` where the slot is empty.
    pub neighbours: [Option<SignalId>; 2],
}

/// The (side, end) pairs adjacent to a corner slot.
pub fn adjacency(order: PlacementOrder, slot: CornerSlot) -> [(Side, End); 2] {
    use CornerSlot::*;
    use End::*;
    use Side::*;
    match (order, slot) {
        (PlacementOrder::Clockwise, TopLeft) => [(Left, Last), (Top, First)],
        (PlacementOrder::Clockwise, TopRight) => [(Top, Last), (Right, First)],
        (PlacementOrder::Clockwise, BottomRight) => [(Right, Last), (Bottom, First)],
        (PlacementOrder::Clockwise, BottomLeft) => [(Bottom, Last), (Left, First)],
        (PlacementOrder::Counterclockwise, TopLeft) => [(Top, Last), (Left, First)],
        (PlacementOrder::Counterclockwise, TopRight) => [(Right, Last), (Top, First)],
        (PlacementOrder::Counterclockwise, BottomRight) => [(Bottom, Last), (Right, First)],
        (PlacementOrder::Counterclockwise, BottomLeft) => [(Left, Last), (Bottom, First)],
    }
}

/// For each side in traversal order, the corner spliced in after it.
pub fn splice_order(order: PlacementOrder) -> [(Side, CornerSlot); 4] {
    match order {
        PlacementOrder::Clockwise => [
            (Side::Top, CornerSlot::TopRight),
            (Side::Right, CornerSlot::BottomRight),
            (Side::Bottom, CornerSlot::BottomLeft),
            (Side::Left, CornerSlot::TopLeft),
        ],
        PlacementOrder::Counterclockwise => [
            (Side::Left, CornerSlot::BottomLeft),
            (Side::Bottom, CornerSlot::BottomRight),
            (Side::Right, CornerSlot::TopRight),
            (Side::Top, CornerSlot::TopLeft),
        ],
    }
}

fn neighbour(ring: &RingConfig, placement: &Placement, side: Side, end: End) -> Option<SignalId> {
    let capacity = side.capacity(ring);
    let index = match end {
        End::First => 0,
        End::Last => capacity.checked_sub(1)?,
    };
    if index >= capacity {
        return None;
    }
    placement.signal_at(&Position::Pad { side, index })
}

/// Resolves all four corners, in splice order.
pub fn resolve_corners(
    ring: &RingConfig,
    placement: &Placement,
    signals: &SignalTable,
    devices: &DeviceTable,
) -> Vec<Corner> {
    let _span = tracing::debug_span!("corners").entered();
    splice_order(ring.placement_order)
        .into_iter()
        .map(|(_, slot)| {
            let [(side_a, end_a), (side_b, end_b)] = adjacency(ring.placement_order, slot);
            let neighbours = [
                neighbour(ring, placement, side_a, end_a),
                neighbour(ring, placement, side_b, end_b),
            ];
            let digital = neighbours
                .iter()
                .all(|n| n.is_some_and(|id| signals.get(id).class.is_digital()));
            let (kind, device) = if digital {
                (CornerKind::Digital, devices.digital_corner.clone())
            } else {
                (CornerKind::Analog, devices.analog_corner.clone())
            };
            tracing::trace!(slot = slot.as_str(), ?kind, "corner typed");
            Corner {
                slot,
                kind,
                device,
                neighbours,
            }
        })
        .collect()
}
