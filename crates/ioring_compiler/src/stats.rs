//! Summary statistics of an intent graph.

use crate::graph::{InstanceKind, IntentGraph};
use ioring_config::Direction;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Counts describing a compiled ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Ring size as `WxH`.
    pub ring_size: String,
    /// Outer pads plus inner pads.
    pub total_pads: usize,
    /// Inner pads only.
    pub inner_pads: usize,
    /// Corner cells.
    pub corners: usize,
    /// Distinct device names, sorted.
    pub device_types: BTreeSet<String>,
    /// Digital IO pads.
    pub digital_ios: usize,
    /// Digital inputs.
    pub inputs: usize,
    /// Digital outputs.
    pub outputs: usize,
}

impl GraphStats {
    /// Computes statistics for `graph`.
    pub fn from_graph(graph: &IntentGraph) -> Self {
        let mut stats = GraphStats {
            ring_size: format!("{}x{}", graph.ring_config.width, graph.ring_config.height),
            total_pads: 0,
            inner_pads: 0,
            corners: 0,
            device_types: BTreeSet::new(),
            digital_ios: 0,
            inputs: 0,
            outputs: 0,
        };
        for instance in &graph.instances {
            stats.device_types.insert(instance.device.clone());
            match instance.kind {
                InstanceKind::Pad => stats.total_pads += 1,
                InstanceKind::InnerPad => {
                    stats.total_pads += 1;
                    stats.inner_pads += 1;
                }
                InstanceKind::Corner => stats.corners += 1,
            }
            match instance.direction {
                Some(Direction::Input) => {
                    stats.digital_ios += 1;
                    stats.inputs += 1;
                }
                Some(Direction::Output) => {
                    stats.digital_ios += 1;
                    stats.outputs += 1;
                }
                None => {}
            }
        }
        stats
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ring size:    {}", self.ring_size)?;
        writeln!(f, "total pads:   {} ({} inner)", self.total_pads, self.inner_pads)?;
        writeln!(f, "corners:      {}", self.corners)?;
        writeln!(
            f,
            "digital IOs:  {} ({} input, {} output)",
            self.digital_ios, self.inputs, self.outputs
        )?;
        let devices: Vec<&str> = self.device_types.iter().map(String::as_str).collect();
        write!(f, "device types: {}", devices.join(", "))
    }
}
