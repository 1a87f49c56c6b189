/*!
 * Event routing.
 *
 * The router is the adapter's public event surface. It consumes the
 * transport's event stream, keeps the node store current, drives device
 * materialization on ready transitions, and republishes transformed
 * readings for already-materialized devices.
 */
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, trace, warn};

use wavemesh_core::types::Value;

use crate::device::{Device, DeviceId};
use crate::error::Result;
use crate::materialize::DeviceMaterializer;
use crate::store::{NodeInfo, NodeStore};
use crate::transport::ZWaveTransport;
use crate::value::{Genre, RawValue, ValueAddress};

/// Capacity of the outbound event channel
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Inbound events delivered by the transport
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The controller connection is up
    Connected,
    /// The driver finished initializing and reports the home identifier
    DriverReady {
        /// The home (network) identifier
        home_id: u32,
    },
    /// A node was discovered on the network
    NodeAdded {
        /// The node identifier
        node_id: u8,
    },
    /// A value slot was reported for a node
    ValueAdded {
        /// The node identifier
        node_id: u8,
        /// The command class wire identifier
        command_class: u8,
        /// The reported value
        value: RawValue,
    },
    /// A previously reported value slot changed
    ValueChanged {
        /// The node identifier
        node_id: u8,
        /// The command class wire identifier
        command_class: u8,
        /// The new value
        value: RawValue,
    },
    /// A node finished interviewing and its metadata is available
    NodeReady {
        /// The node identifier
        node_id: u8,
        /// The node metadata
        info: NodeInfo,
    },
}

/// Outbound events produced for the host application
#[derive(Debug, Clone)]
pub enum AdapterEvent {
    /// A device was materialized; emitted exactly once per device
    Register {
        /// The new device handle
        device: Device,
    },
    /// A transformed reading for a registered device
    Data {
        /// The device the reading belongs to
        device: DeviceId,
        /// The transformed reading
        value: Value,
        /// When the reading was routed
        timestamp: DateTime<Utc>,
    },
}

/// Routes transport events into the node store and out to the host
#[derive(Debug)]
pub struct EventRouter {
    store: NodeStore,
    transport: Arc<dyn ZWaveTransport>,
    events: broadcast::Sender<AdapterEvent>,
    home_id: u32,
}

impl EventRouter {
    /// Create a new router backed by the given transport
    pub fn new(transport: Arc<dyn ZWaveTransport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: NodeStore::new(),
            transport,
            events,
            home_id: 0,
        }
    }

    /// Subscribe to the adapter's outbound events
    pub fn subscribe(&self) -> broadcast::Receiver<AdapterEvent> {
        self.events.subscribe()
    }

    /// Get a clonable handle to the outbound event channel
    pub fn event_sender(&self) -> broadcast::Sender<AdapterEvent> {
        self.events.clone()
    }

    /// Access the node store (read-only)
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Consume transport events until the stream closes.
    ///
    /// A contract violation (a value event for a node that was never added)
    /// stops the loop and surfaces the error; everything else is handled
    /// in-stride.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<TransportEvent>) -> Result<()> {
        while let Some(event) = inbound.recv().await {
            self.handle(event).await?;
        }
        debug!("Transport event stream closed");
        Ok(())
    }

    /// Handle a single transport event
    pub async fn handle(&mut self, event: TransportEvent) -> Result<()> {
        match event {
            TransportEvent::Connected => {
                info!("Connected to controller");
                Ok(())
            }
            TransportEvent::DriverReady { home_id } => {
                info!("Scanning on home id {:#010x}", home_id);
                self.home_id = home_id;
                Ok(())
            }
            TransportEvent::NodeAdded { node_id } => {
                info!("Found new node {}", node_id);
                self.store.create_node(node_id);
                Ok(())
            }
            TransportEvent::ValueAdded {
                node_id,
                command_class,
                value,
            } => {
                trace!(
                    "Value added for node {} class {:#04x} index {}",
                    node_id,
                    command_class,
                    value.index
                );
                self.store.record_value(node_id, command_class, value)
            }
            TransportEvent::ValueChanged {
                node_id,
                command_class,
                value,
            } => self.on_value_changed(node_id, command_class, value),
            TransportEvent::NodeReady { node_id, info } => self.on_node_ready(node_id, info).await,
        }
    }

    fn on_value_changed(&mut self, node_id: u8, command_class: u8, value: RawValue) -> Result<()> {
        debug!(
            "Value changed for node {} class {:#04x} index {}",
            node_id, command_class, value.index
        );

        let addr = ValueAddress::new(node_id, command_class, value.index);
        let genre = value.genre;
        let reading = value.value.clone();
        self.store.record_value(node_id, command_class, value)?;

        if let Some(device) = self.store.bound_device(addr) {
            let transformed = device.transform(&reading);
            let _ = self.events.send(AdapterEvent::Data {
                device: device.id(),
                value: transformed,
                timestamp: Utc::now(),
            });
            return Ok(());
        }

        // Unmapped user-visible values are expected; surface them for
        // operator visibility once the node has a name to report under.
        let named = self
            .store
            .node(node_id)
            .and_then(|n| n.full_name())
            .map(str::to_string);
        match (genre, named) {
            (Genre::User, Some(name)) => {
                warn!("No device mapped for user value at {} on '{}'", addr, name);
            }
            _ => {
                trace!("Ignoring change for unmapped value at {}", addr);
            }
        }
        Ok(())
    }

    async fn on_node_ready(&mut self, node_id: u8, info: NodeInfo) -> Result<()> {
        let (node, already_ready) = self.store.mark_ready(node_id, info)?;
        if already_ready {
            return Ok(());
        }
        info!(
            "Node {} ready: {}",
            node_id,
            node.full_name().unwrap_or("(unnamed)")
        );

        let materializer = DeviceMaterializer::new(self.home_id);
        let devices = materializer
            .materialize(&mut self.store, node_id, self.transport.as_ref())
            .await?;

        for device in devices {
            info!(
                "Registering device {} '{}'",
                device.id(),
                device.display_name()
            );
            if self
                .events
                .send(AdapterEvent::Register { device })
                .is_err()
            {
                error!("No subscribers for register event");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Dimension;
    use crate::error::AdapterError;
    use crate::transport::NullTransport;
    use crate::value::ValueKind;

    fn router() -> EventRouter {
        EventRouter::new(Arc::new(NullTransport))
    }

    fn thermostat_ready(node_id: u8) -> TransportEvent {
        TransportEvent::NodeReady {
            node_id,
            info: NodeInfo {
                name: None,
                manufacturer: "Acme".to_string(),
                product: "Thermostat".to_string(),
            },
        }
    }

    fn temperature(index: u8, reading: f64) -> RawValue {
        RawValue::new(
            index,
            "Temperature",
            ValueKind::Decimal,
            Genre::User,
            Value::Float(reading),
        )
    }

    #[test_log::test(tokio::test)]
    async fn test_thermostat_end_to_end() {
        let mut router = router();
        let mut events = router.subscribe();

        router
            .handle(TransportEvent::DriverReady { home_id: 0xCAFE })
            .await
            .unwrap();
        router
            .handle(TransportEvent::NodeAdded { node_id: 5 })
            .await
            .unwrap();
        router
            .handle(TransportEvent::ValueAdded {
                node_id: 5,
                command_class: 0x31,
                value: temperature(0, 98.6),
            })
            .await
            .unwrap();
        router.handle(thermostat_ready(5)).await.unwrap();

        // Exactly one register event, temperature dimension
        let registered = match events.try_recv().unwrap() {
            AdapterEvent::Register { device } => device,
            other => panic!("expected register event, got {:?}", other),
        };
        assert_eq!(registered.dimension(), Dimension::Temperature);
        assert_eq!(registered.id(), DeviceId::new(0xCAFE, 5, 0x31, 0));
        assert_eq!(registered.display_name(), "Acme Thermostat Temperature");
        assert!(events.try_recv().is_err());

        // A subsequent change routes through the bound transform
        router
            .handle(TransportEvent::ValueChanged {
                node_id: 5,
                command_class: 0x31,
                value: temperature(0, 98.6),
            })
            .await
            .unwrap();

        match events.try_recv().unwrap() {
            AdapterEvent::Data { device, value, .. } => {
                assert_eq!(device, registered.id());
                let celsius = value.as_float().unwrap();
                assert!((celsius - 37.0).abs() < 1e-9);
            }
            other => panic!("expected data event, got {:?}", other),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_duplicate_ready_registers_once() {
        let mut router = router();
        let mut events = router.subscribe();

        router
            .handle(TransportEvent::NodeAdded { node_id: 5 })
            .await
            .unwrap();
        router
            .handle(TransportEvent::ValueAdded {
                node_id: 5,
                command_class: 0x31,
                value: temperature(0, 70.0),
            })
            .await
            .unwrap();
        router.handle(thermostat_ready(5)).await.unwrap();
        router.handle(thermostat_ready(5)).await.unwrap();

        let mut registers = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, AdapterEvent::Register { .. }) {
                registers += 1;
            }
        }
        assert_eq!(registers, 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_unmapped_user_value_warns_without_data() {
        let mut router = router();
        let mut events = router.subscribe();

        router
            .handle(TransportEvent::NodeAdded { node_id: 8 })
            .await
            .unwrap();
        // "Door Sensor" with a non-boolean kind never classifies
        let door = RawValue::new(0, "Door Sensor", ValueKind::Byte, Genre::User, Value::Byte(1));
        router
            .handle(TransportEvent::ValueAdded {
                node_id: 8,
                command_class: 0x30,
                value: door.clone(),
            })
            .await
            .unwrap();
        router
            .handle(TransportEvent::NodeReady {
                node_id: 8,
                info: NodeInfo {
                    name: None,
                    manufacturer: "Acme".to_string(),
                    product: "Contact".to_string(),
                },
            })
            .await
            .unwrap();

        // No device was registered for it
        assert!(events.try_recv().is_err());

        // A later change yields a warning and zero data events
        router
            .handle(TransportEvent::ValueChanged {
                node_id: 8,
                command_class: 0x30,
                value: door,
            })
            .await
            .unwrap();
        assert!(events.try_recv().is_err());
    }

    #[test_log::test(tokio::test)]
    async fn test_value_for_unknown_node_halts() {
        let mut router = router();
        let err = router
            .handle(TransportEvent::ValueAdded {
                node_id: 3,
                command_class: 0x31,
                value: temperature(0, 70.0),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::UnknownNode(3)));
    }

    #[test_log::test(tokio::test)]
    async fn test_run_consumes_stream() {
        let router = router();
        let mut events = router.subscribe();
        let (tx, rx) = mpsc::channel(16);

        let task = tokio::spawn(router.run(rx));

        tx.send(TransportEvent::NodeAdded { node_id: 5 })
            .await
            .unwrap();
        tx.send(TransportEvent::ValueAdded {
            node_id: 5,
            command_class: 0x31,
            value: temperature(0, 50.0),
        })
        .await
        .unwrap();
        tx.send(thermostat_ready(5)).await.unwrap();
        drop(tx);

        task.await.unwrap().unwrap();
        assert!(matches!(
            events.try_recv(),
            Ok(AdapterEvent::Register { .. })
        ));
    }

    #[test_log::test(tokio::test)]
    async fn test_values_arriving_before_metadata_materialize_on_ready() {
        let mut router = router();
        let mut events = router.subscribe();

        router
            .handle(TransportEvent::NodeAdded { node_id: 2 })
            .await
            .unwrap();
        // Value arrives long before the node's metadata
        router
            .handle(TransportEvent::ValueAdded {
                node_id: 2,
                command_class: 0x80,
                value: RawValue::new(
                    0,
                    "Battery Level",
                    ValueKind::Byte,
                    Genre::User,
                    Value::Byte(77),
                ),
            })
            .await
            .unwrap();
        assert!(events.try_recv().is_err());

        router
            .handle(TransportEvent::NodeReady {
                node_id: 2,
                info: NodeInfo {
                    name: Some("Porch".to_string()),
                    manufacturer: "Acme".to_string(),
                    product: "Contact".to_string(),
                },
            })
            .await
            .unwrap();

        match events.try_recv().unwrap() {
            AdapterEvent::Register { device } => {
                assert_eq!(device.dimension(), Dimension::Battery);
                assert_eq!(device.display_name(), "Porch Battery Level");
            }
            other => panic!("expected register event, got {:?}", other),
        }
    }
}
