/*!
 * Prelude module for wavemesh core.
 *
 * This module re-exports commonly used types and functions from the core
 * crate to make them easier to import.
 */

// Re-export error types
pub use crate::error::{Error, Result};

// Re-export core types
pub use crate::types::Value;

// Re-export config types
pub use crate::config::{Config, ConfigBuilder, SharedConfig};

// Re-export logging helpers
pub use crate::logging::node_span;
pub use tracing::{debug, error, info, trace, warn};

// Re-export core initialization
pub use crate::init;
