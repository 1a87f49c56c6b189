/*!
 * Error types for the wavemesh Z-Wave adapter crate.
 */
use thiserror::Error;

/// Error type for adapter operations
#[derive(Error, Debug)]
pub enum AdapterError {
    /// A value event referenced a node that was never announced. The
    /// transport guarantees "node added" precedes every other event for a
    /// node, so this is a broken ordering contract, not recoverable state.
    #[error("Unknown node {0}: value event arrived before the node was added")]
    UnknownNode(u8),

    /// A second device was bound to a value slot that already has one
    #[error("Device already bound for node {node} class {command_class:#04x} index {index}")]
    AlreadyBound {
        /// The node identifier
        node: u8,
        /// The command class wire identifier
        command_class: u8,
        /// The value index within the command class
        index: u8,
    },

    /// Transport-side failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] wavemesh_core::error::Error),
}

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

impl AdapterError {
    /// Create a new transport error
    pub fn transport<S: AsRef<str>>(msg: S) -> Self {
        AdapterError::Transport(msg.as_ref().to_string())
    }
}
