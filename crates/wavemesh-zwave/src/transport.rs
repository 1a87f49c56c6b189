/*!
 * Transport collaborator interface.
 *
 * The serial protocol stack (connection handling, command class codecs, the
 * polling scheduler) lives outside this crate. The adapter sees it as an
 * inbound event stream plus the outbound requests defined here.
 */
use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Result;

/// Outbound requests the adapter issues to the protocol stack
#[async_trait]
pub trait ZWaveTransport: Send + Sync + Debug {
    /// Request active polling for a (node, command class) pair
    ///
    /// Fire-and-forget from the adapter's perspective; failures are logged,
    /// never propagated into materialization.
    async fn enable_polling(&self, node_id: u8, command_class: u8) -> Result<()>;
}

/// A transport that accepts and discards every request
///
/// Useful when running the adapter against a replayed event stream with no
/// live controller attached.
#[derive(Debug, Default)]
pub struct NullTransport;

#[async_trait]
impl ZWaveTransport for NullTransport {
    async fn enable_polling(&self, _node_id: u8, _command_class: u8) -> Result<()> {
        Ok(())
    }
}
