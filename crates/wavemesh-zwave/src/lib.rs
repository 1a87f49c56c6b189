/*!
 * wavemesh Z-Wave adapter
 *
 * This crate discovers nodes on a Z-Wave mesh, classifies their reported
 * values, and materializes normalized device handles for the host
 * application. The serial protocol stack is an external collaborator; the
 * adapter consumes its event stream and issues polling requests back.
 */

#![warn(missing_docs)]

// Re-export core prelude
pub use wavemesh_core::prelude;

pub mod bridge;
pub mod classify;
pub mod command_class;
pub mod device;
pub mod error;
pub mod materialize;
pub mod router;
pub mod store;
pub mod transport;
pub mod value;

// Re-export the main adapter surface
pub use bridge::ZWaveBridge;
pub use classify::{classify, DeviceDescriptor, Dimension, Transform};
pub use command_class::CommandClass;
pub use device::{Device, DeviceId};
pub use error::{AdapterError, Result};
pub use router::{AdapterEvent, EventRouter, TransportEvent};
pub use store::{Node, NodeInfo, NodeStore};
pub use transport::{NullTransport, ZWaveTransport};
pub use value::{Genre, RawValue, ValueAddress, ValueKind};

/// wavemesh Z-Wave adapter crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the adapter crate
pub fn init() -> Result<()> {
    tracing::info!("wavemesh Z-Wave adapter {} initialized", VERSION);
    Ok(())
}
