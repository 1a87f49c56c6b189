/*!
 * Materialized device handles.
 *
 * A device is the immutable, host-facing abstraction bound to exactly one
 * raw value slot. It carries a deterministic global identifier, a display
 * name, a dimension, and the transform applied to every routed reading.
 */
use std::fmt;

use serde::{Deserialize, Serialize};

use wavemesh_core::types::Value;

use crate::classify::{DeviceDescriptor, Dimension, Transform};
use crate::value::ValueAddress;

/// Globally unique device identifier
///
/// Derived from the home identifier plus the value slot address, so two
/// distinct (node, command class, index) triples can never collide and the
/// identifier is stable across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId {
    /// The home (network) identifier assigned by the controller
    pub home_id: u32,
    /// The node identifier
    pub node: u8,
    /// The command class wire identifier
    pub command_class: u8,
    /// The value index within the command class
    pub index: u8,
}

impl DeviceId {
    /// Create a new device identifier
    pub fn new(home_id: u32, node: u8, command_class: u8, index: u8) -> Self {
        Self {
            home_id,
            node,
            command_class,
            index,
        }
    }

    /// The value slot this device is bound to
    pub fn address(&self) -> ValueAddress {
        ValueAddress::new(self.node, self.command_class, self.index)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{}-{}-{}",
            self.home_id, self.node, self.command_class, self.index
        )
    }
}

/// A materialized device handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    id: DeviceId,
    display_name: String,
    dimension: Dimension,
    transform: Transform,
}

impl Device {
    /// Create a new device from a classification descriptor
    pub fn new(id: DeviceId, display_name: impl Into<String>, descriptor: DeviceDescriptor) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            dimension: descriptor.dimension,
            transform: descriptor.transform,
        }
    }

    /// Get the device identifier
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Get the display name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Get the device dimension
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Apply the device's transform to a reading
    pub fn transform(&self, value: &Value) -> Value {
        self.transform.apply(value)
    }
}
