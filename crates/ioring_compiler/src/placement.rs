//! Ring positions and the placement mapper.
//!
//! Outer signals fill the sides in traversal order (clockwise: top, right,
//! bottom, left; counterclockwise: left, bottom, right, top), indices
//! ascending from 0 on each side. Inner pads are spliced into the final
//! order right after the outer pad on their lower index.

use crate::codes;
use crate::ids::SignalId;
use crate::signal::SignalTable;
use ioring_config::{PlacementOrder, RingConfig};
use ioring_diagnostics::{Diagnostic, DiagnosticSink, Label, Location};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the four sides of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// Left side.
    Left,
    /// Right side.
    Right,
    /// Top side.
    Top,
    /// Bottom side.
    Bottom,
}

impl Side {
    /// All sides, in a fixed order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// Lower-case name used in position strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }

    /// Returns `true` for the left and right sides, whose pads use the
    /// horizontal geometry variant.
    pub fn is_vertical_edge(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// Slot capacity of this side: top/bottom hold `width` pads, left/right
    /// hold `height` pads.
    pub fn capacity(self, ring: &RingConfig) -> usize {
        if self.is_vertical_edge() {
            ring.height
        } else {
            ring.width
        }
    }

    fn parse(s: &str) -> Option<Side> {
        match s {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            "top" => Some(Side::Top),
            "bottom" => Some(Side::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sides in the order the placement consumes them.
pub fn traversal(order: PlacementOrder) -> [Side; 4] {
    match order {
        PlacementOrder::Clockwise => [Side::Top, Side::Right, Side::Bottom, Side::Left],
        PlacementOrder::Counterclockwise => [Side::Left, Side::Bottom, Side::Right, Side::Top],
    }
}

/// One of the four corner slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CornerSlot {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl CornerSlot {
    /// Position string of the slot.
    pub fn as_str(self) -> &'static str {
        match self {
            CornerSlot::TopLeft => "top_left",
            CornerSlot::TopRight => "top_right",
            CornerSlot::BottomLeft => "bottom_left",
            CornerSlot::BottomRight => "bottom_right",
        }
    }

    /// Instance name of the corner cell in this slot.
    pub fn instance_name(self) -> &'static str {
        match self {
            CornerSlot::TopLeft => "CORNER_TL",
            CornerSlot::TopRight => "CORNER_TR",
            CornerSlot::BottomLeft => "CORNER_BL",
            CornerSlot::BottomRight => "CORNER_BR",
        }
    }

    fn parse(s: &str) -> Option<CornerSlot> {
        match s {
            "top_left" => Some(CornerSlot::TopLeft),
            "top_right" => Some(CornerSlot::TopRight),
            "bottom_left" => Some(CornerSlot::BottomLeft),
            "bottom_right" => Some(CornerSlot::BottomRight),
            _ => None,
        }
    }
}

/// A position string that does not name a ring location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed position '{input}': {reason}")]
pub struct PositionParseError {
    /// The string as given.
    pub input: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

/// A location on the ring: an outer slot, the gap between two outer slots,
/// or a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Outer slot `side_index`.
    Pad {
        /// Side of the slot.
        side: Side,
        /// Index along the side.
        index: usize,
    },
    /// Inner pad `side_first_second` between two outer slots.
    InnerPad {
        /// Side of the gap.
        side: Side,
        /// Lower outer index.
        first: usize,
        /// Upper outer index.
        second: usize,
    },
    /// Corner slot.
    Corner(CornerSlot),
}

impl Position {
    /// Side of a pad or inner pad; `None` for corners.
    pub fn side(&self) -> Option<Side> {
        match self {
            Position::Pad { side, .. } | Position::InnerPad { side, .. } => Some(*side),
            Position::Corner(_) => None,
        }
    }

    /// Ordering key within a side: outer index, then inner pads after the
    /// outer pad they follow.
    pub fn side_order_key(&self) -> Option<(usize, bool)> {
        match self {
            Position::Pad { index, .. } => Some((*index, false)),
            Position::InnerPad { first, .. } => Some((*first, true)),
            Position::Corner(_) => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Pad { side, index } => write!(f, "{side}_{index}"),
            Position::InnerPad {
                side,
                first,
                second,
            } => write!(f, "{side}_{first}_{second}"),
            Position::Corner(slot) => write!(f, "{}", slot.as_str()),
        }
    }
}

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| PositionParseError {
            input: s.to_string(),
            reason,
        };
        if let Some(slot) = CornerSlot::parse(s) {
            return Ok(Position::Corner(slot));
        }
        let mut parts = s.split('_');
        let side = parts
            .next()
            .and_then(Side::parse)
            .ok_or_else(|| err("expected left, right, top, or bottom"))?;
        let indices: Vec<&str> = parts.collect();
        let parse_index = |text: &str| {
            text.parse::<usize>()
                .map_err(|_| err("index is not a non-negative integer"))
        };
        match indices.as_slice() {
            [index] => Ok(Position::Pad {
                side,
                index: parse_index(index)?,
            }),
            [first, second] => Ok(Position::InnerPad {
                side,
                first: parse_index(first)?,
                second: parse_index(second)?,
            }),
            _ => Err(err("expected side_index or side_index_index")),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A signal assigned to a pad or inner pad position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedPad {
    /// The placed signal.
    pub signal: SignalId,
    /// Where it sits.
    pub position: Position,
}

/// The result of placement: every pad in final traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Traversal direction.
    pub order: PlacementOrder,
    /// Pads in final order, inner pads spliced in.
    pub pads: Vec<PlacedPad>,
    occupied: [usize; 4],
    ordinals: Vec<Option<usize>>,
}

impl Placement {
    fn new(order: PlacementOrder, pads: Vec<PlacedPad>, occupied: [usize; 4], signals: usize) -> Self {
        let mut ordinals = vec![None; signals];
        for (i, pad) in pads.iter().enumerate() {
            ordinals[pad.signal.index()] = Some(i);
        }
        Self {
            order,
            pads,
            occupied,
            ordinals,
        }
    }

    /// Number of occupied outer slots on `side`.
    pub fn occupied(&self, side: Side) -> usize {
        self.occupied[side_slot(side)]
    }

    /// Index of a signal in the final order.
    pub fn ordinal(&self, signal: SignalId) -> Option<usize> {
        self.ordinals.get(signal.index()).copied().flatten()
    }

    /// The signal at a pad or inner pad position.
    pub fn signal_at(&self, position: &Position) -> Option<SignalId> {
        self.pads
            .iter()
            .find(|pad| pad.position == *position)
            .map(|pad| pad.signal)
    }

    /// The position of a placed signal.
    pub fn position_of(&self, signal: SignalId) -> Option<Position> {
        self.ordinal(signal).map(|i| self.pads[i].position)
    }

    /// Signals in final order.
    pub fn ordered_signals(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.pads.iter().map(|pad| pad.signal)
    }
}

fn side_slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
        Side::Top => 2,
        Side::Bottom => 3,
    }
}

/// Assigns every classified signal a ring position.
///
/// Overflow (E301) and inner pad problems (E302 to E305) are reported into
/// `sink`; unfilled slots produce W301.
pub fn place(signals: &SignalTable, ring: &RingConfig, sink: &DiagnosticSink) -> Placement {
    let _span = tracing::debug_span!("place", order = %ring.placement_order).entered();
    let sides = traversal(ring.placement_order);

    let outer = signals.outer();
    let capacity = ring.capacity();
    if outer.len() > capacity {
        let first_unplaced = &outer[capacity];
        sink.emit(
            Diagnostic::error(
                codes::RING_OVERFLOW,
                format!(
                    "{} signals requested but the {}x{} ring has {} slots",
                    outer.len(),
                    ring.width,
                    ring.height,
                    capacity
                ),
                Location::Config("ring".into()),
            )
            .with_label(Label::primary(
                first_unplaced.location(),
                "first signal without a slot",
            ))
            .with_help("increase `ring.width` or `ring.height`"),
        );
    } else if outer.len() < capacity {
        sink.emit(
            Diagnostic::warning(
                codes::RING_UNDERFILLED,
                format!(
                    "{} of {} ring slots are unfilled",
                    capacity - outer.len(),
                    capacity
                ),
                Location::Config("ring".into()),
            )
            .with_note("trailing sides in traversal order are left partially empty"),
        );
    }

    let mut occupied = [0usize; 4];
    let mut outer_slots: Vec<(Side, usize, SignalId)> = Vec::with_capacity(outer.len());
    let mut next = outer.iter();
    'sides: for side in sides {
        for index in 0..side.capacity(ring) {
            match next.next() {
                Some(signal) => {
                    occupied[side_slot(side)] += 1;
                    outer_slots.push((side, index, signal.id));
                }
                None => break 'sides,
            }
        }
    }

    let inner = place_inner(signals, &occupied, sink);

    let mut pads = Vec::with_capacity(outer_slots.len() + inner.len());
    for (side, index, signal) in outer_slots {
        pads.push(PlacedPad {
            signal,
            position: Position::Pad { side, index },
        });
        if let Some(pad) = inner
            .iter()
            .find(|p| matches!(p.position, Position::InnerPad { side: s, first, .. } if s == side && first == index))
        {
            pads.push(*pad);
        }
    }

    tracing::debug!(pads = pads.len(), inner = inner.len(), "placement complete");
    Placement::new(ring.placement_order, pads, occupied, signals.len())
}

fn place_inner(signals: &SignalTable, occupied: &[usize; 4], sink: &DiagnosticSink) -> Vec<PlacedPad> {
    let mut placed: Vec<PlacedPad> = Vec::new();
    for signal in signals.inner() {
        let Some(text) = signal.inner_position.as_deref() else {
            continue;
        };
        let location = Location::Position(text.to_string());
        let position = match text.parse::<Position>() {
            Ok(position @ Position::InnerPad { .. }) => position,
            Ok(_) => {
                sink.emit(Diagnostic::error(
                    codes::INNER_MALFORMED,
                    format!("inner pad '{}' position '{text}' is not of the form side_i_j", signal.name),
                    location,
                ));
                continue;
            }
            Err(err) => {
                sink.emit(Diagnostic::error(
                    codes::INNER_MALFORMED,
                    format!("inner pad '{}': {err}", signal.name),
                    location,
                ));
                continue;
            }
        };
        let Position::InnerPad {
            side,
            first,
            second,
        } = position
        else {
            continue;
        };

        if second != first + 1 {
            sink.emit(
                Diagnostic::error(
                    codes::INNER_NOT_ADJACENT,
                    format!(
                        "inner pad '{}' at '{text}' must sit between adjacent ascending indices",
                        signal.name
                    ),
                    location,
                )
                .with_help(format!("use '{side}_{first}_{}'", first + 1)),
            );
            continue;
        }
        let on_side = occupied[side_slot(side)];
        if second >= on_side {
            sink.emit(
                Diagnostic::error(
                    codes::INNER_OUT_OF_RANGE,
                    format!(
                        "inner pad '{}' at '{text}' is outside the {on_side} occupied slots of side {side}",
                        signal.name
                    ),
                    location,
                ),
            );
            continue;
        }
        if let Some(taken) = placed.iter().find(|p| p.position == position) {
            let other = signals.get(taken.signal);
            sink.emit(
                Diagnostic::error(
                    codes::INNER_GAP_TAKEN,
                    format!("gap '{text}' already holds inner pad '{}'", other.name),
                    location,
                )
                .with_label(Label::secondary(other.location(), "first inner pad here")),
            );
            continue;
        }
        placed.push(PlacedPad {
            signal: signal.id,
            position,
        });
    }
    placed
}
