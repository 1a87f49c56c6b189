/*!
 * Device materialization.
 *
 * Runs exactly once per node, on its ready transition: enables polling for
 * actuator command classes, classifies every present value slot, and
 * constructs the device handles that are bound into the store and emitted
 * to the host application.
 */
use tracing::{debug, warn};

use crate::classify::classify;
use crate::command_class::CommandClass;
use crate::device::{Device, DeviceId};
use crate::error::{AdapterError, Result};
use crate::store::NodeStore;
use crate::transport::ZWaveTransport;

/// Builds device handles for nodes that have become ready
#[derive(Debug, Clone, Copy)]
pub struct DeviceMaterializer {
    home_id: u32,
}

impl DeviceMaterializer {
    /// Create a materializer for the given home network
    pub fn new(home_id: u32) -> Self {
        Self { home_id }
    }

    /// Materialize devices for a ready node.
    ///
    /// Emission order is deterministic: command classes in the node's
    /// encounter order, values within a class in index order. Absent value
    /// slots are skipped; values without a semantic mapping produce no
    /// device and no signal.
    pub async fn materialize(
        &self,
        store: &mut NodeStore,
        node_id: u8,
        transport: &dyn ZWaveTransport,
    ) -> Result<Vec<Device>> {
        let node = store
            .node(node_id)
            .ok_or(AdapterError::UnknownNode(node_id))?;
        let full_name = node.full_name().unwrap_or("Unknown device").to_string();

        let mut polled = Vec::new();
        let mut devices = Vec::new();

        for class in node.command_classes() {
            if CommandClass::wire_id_is_polled(class) {
                polled.push(class);
            }

            let Some(values) = node.values(class) else {
                continue;
            };
            for slot in values.iter().flatten() {
                let Some(descriptor) = classify(slot) else {
                    debug!(
                        "No semantic mapping for node {} class {:#04x} value '{}'",
                        node_id, class, slot.label
                    );
                    continue;
                };

                let id = DeviceId::new(self.home_id, node_id, class, slot.index);
                let display_name = format!("{} {}", full_name, slot.label);
                devices.push(Device::new(id, display_name, descriptor));
            }
        }

        // Polling requests are fire-and-forget; materialization runs at most
        // once per node, so each (node, class) pair is requested at most once.
        for class in polled {
            if let Err(e) = transport.enable_polling(node_id, class).await {
                warn!(
                    "Failed to enable polling for node {} class {:#04x}: {}",
                    node_id, class, e
                );
            }
        }

        for device in &devices {
            store.bind_device(device.clone())?;
        }

        Ok(devices)
    }
}
