/*!
 * Raw value records as reported by the mesh transport.
 */
use std::fmt;

use serde::{Deserialize, Serialize};

use wavemesh_core::types::Value;

/// The primitive kind of a reported value slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Boolean value
    Bool,
    /// Single byte value
    Byte,
    /// Decimal value
    Decimal,
    /// Integer value
    Int,
    /// Short integer value
    Short,
    /// String value
    String,
    /// Selection list value
    List,
    /// Write-only button
    Button,
}

/// Classification tag assigned to a value slot by the protocol stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    /// The core operational value of a command class
    Basic,
    /// User-facing values (sensor readings, switch states)
    User,
    /// Configuration parameters
    Config,
    /// Internal values maintained by the protocol stack
    System,
}

/// A single reported measurement or state slot within a command class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawValue {
    /// Position within the command class's value list, unique per
    /// (node, command class)
    pub index: u8,
    /// Human-readable semantic name
    pub label: String,
    /// Primitive kind of the value
    pub kind: ValueKind,
    /// Classification tag
    pub genre: Genre,
    /// Current reading
    pub value: Value,
}

impl RawValue {
    /// Create a new raw value record
    pub fn new(
        index: u8,
        label: impl Into<String>,
        kind: ValueKind,
        genre: Genre,
        value: Value,
    ) -> Self {
        Self {
            index,
            label: label.into(),
            kind,
            genre,
            value,
        }
    }
}

/// The address of a value slot: (node, command class, index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueAddress {
    /// The node identifier
    pub node: u8,
    /// The command class wire identifier
    pub command_class: u8,
    /// The value index within the command class
    pub index: u8,
}

impl ValueAddress {
    /// Create a new value address
    pub fn new(node: u8, command_class: u8, index: u8) -> Self {
        Self {
            node,
            command_class,
            index,
        }
    }
}

impl fmt::Display for ValueAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} class {:#04x} index {}",
            self.node, self.command_class, self.index
        )
    }
}
