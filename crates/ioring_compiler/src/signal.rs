//! Classified signals and their final roles.
//!
//! Classification assigns each requested signal a [`SignalClass`] and a
//! [`ProviderHint`]; the final [`Role`] is only known once the domain
//! resolver has picked providers.

use crate::ids::SignalId;
use ioring_config::Direction;
use ioring_diagnostics::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The functional class of a signal before provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalClass {
    /// Analog signal pad.
    AnalogIo,
    /// Analog supply.
    AnalogPower,
    /// Analog return.
    AnalogGround,
    /// Digital signal pad.
    DigitalIo,
    /// Digital supply.
    DigitalPower,
    /// Digital return.
    DigitalGround,
}

impl SignalClass {
    /// Returns `true` for analog supplies and returns.
    pub fn is_analog_supply(self) -> bool {
        matches!(self, SignalClass::AnalogPower | SignalClass::AnalogGround)
    }

    /// Returns `true` for every digital class.
    pub fn is_digital(self) -> bool {
        matches!(
            self,
            SignalClass::DigitalIo | SignalClass::DigitalPower | SignalClass::DigitalGround
        )
    }
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalClass::AnalogIo => "analog IO",
            SignalClass::AnalogPower => "analog power",
            SignalClass::AnalogGround => "analog ground",
            SignalClass::DigitalIo => "digital IO",
            SignalClass::DigitalPower => "digital power",
            SignalClass::DigitalGround => "digital ground",
        };
        write!(f, "{s}")
    }
}

/// How an analog supply takes part in provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderHint {
    /// The resolver may pick it.
    #[default]
    Auto,
    /// The user designated this name as the provider.
    Designated,
    /// The user pinned it to consumer.
    ConsumerOnly,
}

/// The final role of a pad after domain resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Analog signal pad.
    AnalogIo,
    /// Analog supply that draws from its domain's provider.
    AnalogPowerConsumer,
    /// The analog supply providing its domain.
    AnalogPowerProvider,
    /// Analog return that references its domain's provider.
    AnalogGroundConsumer,
    /// The analog return providing its domain.
    AnalogGroundProvider,
    /// Digital signal pad.
    DigitalIo,
    /// Digital supply.
    DigitalPower,
    /// Digital return.
    DigitalGround,
}

impl Role {
    /// Returns `true` for the two analog provider roles.
    pub fn is_provider(self) -> bool {
        matches!(self, Role::AnalogPowerProvider | Role::AnalogGroundProvider)
    }

    /// Returns `true` for every digital role.
    pub fn is_digital(self) -> bool {
        matches!(self, Role::DigitalIo | Role::DigitalPower | Role::DigitalGround)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::AnalogIo => "analog_io",
            Role::AnalogPowerConsumer => "analog_power_consumer",
            Role::AnalogPowerProvider => "analog_power_provider",
            Role::AnalogGroundConsumer => "analog_ground_consumer",
            Role::AnalogGroundProvider => "analog_ground_provider",
            Role::DigitalIo => "digital_io",
            Role::DigitalPower => "digital_power",
            Role::DigitalGround => "digital_ground",
        };
        write!(f, "{s}")
    }
}

/// A requested signal after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Stable ID; outer signals first in input order, then inner pads.
    pub id: SignalId,
    /// Name as written by the user, bus index included.
    pub name: String,
    /// Position in the user's input; inner pads continue after the last
    /// outer signal.
    pub raw_index: usize,
    /// Functional class.
    pub class: SignalClass,
    /// Provider participation for analog supplies.
    pub hint: ProviderHint,
    /// Direction of digital IO pads.
    pub direction: Option<Direction>,
    /// Device override, applied verbatim apart from the geometry suffix.
    pub device: Option<String>,
    /// Domain override.
    pub domain: Option<String>,
    /// Requested position string for inner pads.
    pub inner_position: Option<String>,
}

impl Signal {
    /// Returns `true` if this signal is an inner pad.
    pub fn is_inner(&self) -> bool {
        self.inner_position.is_some()
    }

    /// Location for diagnostics about this signal.
    pub fn location(&self) -> Location {
        match &self.inner_position {
            Some(position) => Location::Position(position.clone()),
            None => Location::signal(self.raw_index, &self.name),
        }
    }
}

/// All classified signals, indexed by [`SignalId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalTable {
    signals: Vec<Signal>,
    outer_count: usize,
}

impl SignalTable {
    /// Builds a table from outer signals followed by inner pads.
    pub fn new(signals: Vec<Signal>, outer_count: usize) -> Self {
        Self {
            signals,
            outer_count,
        }
    }

    /// Returns the signal with the given ID.
    pub fn get(&self, id: SignalId) -> &Signal {
        &self.signals[id.index()]
    }

    /// Iterates over every signal.
    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    /// The outer ring signals in input order.
    pub fn outer(&self) -> &[Signal] {
        &self.signals[..self.outer_count]
    }

    /// The inner pads in input order.
    pub fn inner(&self) -> &[Signal] {
        &self.signals[self.outer_count..]
    }

    /// Total number of signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns `true` if the table holds no signals.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(index: usize, name: &str, class: SignalClass) -> Signal {
        Signal {
            id: SignalId::from_index(index),
            name: name.to_string(),
            raw_index: index,
            class,
            hint: ProviderHint::Auto,
            direction: None,
            device: None,
            domain: None,
            inner_position: None,
        }
    }

    #[test]
    fn class_predicates() {
        assert!(SignalClass::AnalogPower.is_analog_supply());
        assert!(!SignalClass::AnalogIo.is_analog_supply());
        assert!(SignalClass::DigitalGround.is_digital());
        assert!(!SignalClass::AnalogGround.is_digital());
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&Role::AnalogPowerProvider).unwrap();
        assert_eq!(json, "\"analog_power_provider\"");
        assert_eq!(Role::AnalogGroundConsumer.to_string(), "analog_ground_consumer");
    }

    #[test]
    fn table_splits_outer_and_inner() {
        let mut inner = signal(2, "VREF", SignalClass::AnalogIo);
        inner.inner_position = Some("left_0_1".into());
        let table = SignalTable::new(
            vec![
                signal(0, "AVDD", SignalClass::AnalogPower),
                signal(1, "AVSS", SignalClass::AnalogGround),
                inner,
            ],
            2,
        );
        assert_eq!(table.outer().len(), 2);
        assert_eq!(table.inner()[0].name, "VREF");
        assert!(table.get(SignalId::from_raw(2)).is_inner());
        assert_eq!(
            table.get(SignalId::from_raw(2)).location(),
            Location::Position("left_0_1".into())
        );
        assert_eq!(
            table.get(SignalId::from_raw(1)).location(),
            Location::signal(1, "AVSS")
        );
    }
}
