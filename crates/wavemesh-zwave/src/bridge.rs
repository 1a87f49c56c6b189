/*!
 * Bridge bootstrap.
 *
 * Wires a configured transport to the event router and runs the routing
 * loop on a background task. The serial protocol stack itself is provided
 * by the caller as a [`ZWaveTransport`] plus a [`TransportEvent`] stream.
 */
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use wavemesh_core::config::SharedConfig;

use crate::router::{AdapterEvent, EventRouter, TransportEvent};
use crate::transport::ZWaveTransport;

/// A running adapter instance
#[derive(Debug)]
pub struct ZWaveBridge {
    events: broadcast::Sender<AdapterEvent>,
    task: JoinHandle<()>,
}

impl ZWaveBridge {
    /// Start the bridge: spawn the routing loop over the given inbound
    /// event stream.
    pub fn start(
        config: SharedConfig,
        transport: Arc<dyn ZWaveTransport>,
        inbound: mpsc::Receiver<TransportEvent>,
    ) -> Self {
        let transport_cfg = &config.get().transport;
        info!(
            "Starting bridge on {} (poll interval {}ms)",
            transport_cfg.device, transport_cfg.poll_interval_ms
        );

        let router = EventRouter::new(transport);
        let events = router.event_sender();

        let task = tokio::spawn(async move {
            if let Err(e) = router.run(inbound).await {
                error!("Event routing halted: {}", e);
            }
        });

        Self { events, task }
    }

    /// Subscribe to the adapter's outbound events
    pub fn subscribe(&self) -> broadcast::Receiver<AdapterEvent> {
        self.events.subscribe()
    }

    /// Stop the routing loop
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
        info!("Bridge stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NodeInfo;
    use crate::transport::NullTransport;
    use crate::value::{Genre, RawValue, ValueKind};
    use wavemesh_core::config::Config;
    use wavemesh_core::types::Value;

    #[tokio::test]
    async fn test_bridge_forwards_register_events() {
        let config = SharedConfig::new(Config::default());
        let (tx, rx) = mpsc::channel(16);
        let bridge = ZWaveBridge::start(config, Arc::new(NullTransport), rx);
        let mut events = bridge.subscribe();

        tx.send(TransportEvent::NodeAdded { node_id: 5 })
            .await
            .unwrap();
        tx.send(TransportEvent::ValueAdded {
            node_id: 5,
            command_class: 0x31,
            value: RawValue::new(
                0,
                "Temperature",
                ValueKind::Decimal,
                Genre::User,
                Value::Float(70.0),
            ),
        })
        .await
        .unwrap();
        tx.send(TransportEvent::NodeReady {
            node_id: 5,
            info: NodeInfo {
                name: None,
                manufacturer: "Acme".to_string(),
                product: "Thermostat".to_string(),
            },
        })
        .await
        .unwrap();

        let event = events.recv().await.unwrap();
        assert!(matches!(event, AdapterEvent::Register { .. }));

        bridge.shutdown().await;
    }
}
