/*!
 * Node store.
 *
 * In-memory table of discovered nodes and their reported value slots, plus
 * the (node, command class, index) -> device routing table. The store is
 * exclusively owned by the event router; all mutation happens on event
 * handler turns, so no interior locking is needed.
 */
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::device::{Device, DeviceId};
use crate::error::{AdapterError, Result};
use crate::value::{RawValue, ValueAddress};

/// Node metadata delivered with the "node ready" event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Optional user-assigned name
    pub name: Option<String>,
    /// Manufacturer name
    pub manufacturer: String,
    /// Product name
    pub product: String,
}

/// The value slots reported for one command class, in index order.
/// Unreported indices are legitimately absent.
#[derive(Debug, Clone, Default)]
struct CommandValues {
    class: u8,
    values: Vec<Option<RawValue>>,
}

/// A discovered network endpoint
#[derive(Debug, Clone)]
pub struct Node {
    id: u8,
    manufacturer: String,
    product: String,
    name: Option<String>,
    full_name: Option<String>,
    ready: bool,
    // Encounter order of command classes is an observable contract for
    // device registration order, so this is a Vec rather than a map.
    commands: Vec<CommandValues>,
}

impl Node {
    fn new(id: u8) -> Self {
        Self {
            id,
            manufacturer: String::new(),
            product: String::new(),
            name: None,
            full_name: None,
            ready: false,
            commands: Vec::new(),
        }
    }

    /// Get the node identifier
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Get the manufacturer name (empty until the node is ready)
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Get the product name (empty until the node is ready)
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Get the user-assigned name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the node has been promoted to ready
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The derived display name, computed once when the node becomes ready
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Command classes reported for this node, in encounter order
    pub fn command_classes(&self) -> impl Iterator<Item = u8> + '_ {
        self.commands.iter().map(|c| c.class)
    }

    /// The value slots for a command class, in index order; absent slots
    /// are `None`
    pub fn values(&self, command_class: u8) -> Option<&[Option<RawValue>]> {
        self.commands
            .iter()
            .find(|c| c.class == command_class)
            .map(|c| c.values.as_slice())
    }

    fn slot_mut(&mut self, command_class: u8, index: u8) -> &mut Option<RawValue> {
        let entry = match self.commands.iter().position(|c| c.class == command_class) {
            Some(pos) => &mut self.commands[pos],
            None => {
                self.commands.push(CommandValues {
                    class: command_class,
                    values: Vec::new(),
                });
                self.commands.last_mut().unwrap()
            }
        };
        let index = index as usize;
        if entry.values.len() <= index {
            entry.values.resize(index + 1, None);
        }
        &mut entry.values[index]
    }

    fn derive_full_name(info: &NodeInfo) -> String {
        match &info.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{} {}", info.manufacturer, info.product)
                .trim()
                .to_string(),
        }
    }
}

/// In-memory table of discovered nodes and device bindings
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: HashMap<u8, Node>,
    bindings: HashMap<ValueAddress, DeviceId>,
    devices: HashMap<DeviceId, Device>,
}

impl NodeStore {
    /// Create a new, empty node store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly announced node. Announcing the same node twice leaves
    /// the existing entry untouched.
    pub fn create_node(&mut self, id: u8) {
        self.nodes.entry(id).or_insert_with(|| Node::new(id));
    }

    /// Get a node by identifier
    pub fn node(&self, id: u8) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Number of known nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Record a reported value slot, creating or overwriting the slot at
    /// its index.
    ///
    /// The transport guarantees the node was announced first; a value for
    /// an unknown node is a broken ordering contract and surfaces as
    /// [`AdapterError::UnknownNode`] rather than being silently dropped.
    pub fn record_value(&mut self, node_id: u8, command_class: u8, value: RawValue) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(AdapterError::UnknownNode(node_id))?;
        let index = value.index;
        *node.slot_mut(command_class, index) = Some(value);
        Ok(())
    }

    /// Promote a node to ready, attaching its metadata and computing the
    /// derived display name.
    ///
    /// Idempotent: a second call for the same node performs no mutation and
    /// reports `already_ready = true`.
    pub fn mark_ready(&mut self, node_id: u8, info: NodeInfo) -> Result<(&Node, bool)> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(AdapterError::UnknownNode(node_id))?;

        if node.ready {
            debug!(node = node_id, "Duplicate ready event ignored");
            return Ok((&*node, true));
        }

        node.full_name = Some(Node::derive_full_name(&info));
        node.manufacturer = info.manufacturer;
        node.product = info.product;
        node.name = info.name;
        node.ready = true;
        Ok((&*node, false))
    }

    /// Look up a reported value slot
    pub fn lookup_value(&self, addr: ValueAddress) -> Option<&RawValue> {
        self.nodes
            .get(&addr.node)?
            .values(addr.command_class)?
            .get(addr.index as usize)?
            .as_ref()
    }

    /// Bind a materialized device to its value slot
    ///
    /// At most one device may ever be bound per slot; a second binding is a
    /// programming-contract violation.
    pub fn bind_device(&mut self, device: Device) -> Result<()> {
        let addr = device.id().address();
        if self.bindings.contains_key(&addr) {
            return Err(AdapterError::AlreadyBound {
                node: addr.node,
                command_class: addr.command_class,
                index: addr.index,
            });
        }
        self.bindings.insert(addr, device.id());
        self.devices.insert(device.id(), device);
        Ok(())
    }

    /// Get the device bound to a value slot, if any
    pub fn bound_device(&self, addr: ValueAddress) -> Option<&Device> {
        let id = self.bindings.get(&addr)?;
        self.devices.get(id)
    }
}
