//! Process-wide logging setup shared by the OrderApp binaries.

/// Initialize tracing with the default configuration.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(&tracing::LogConfig::default());
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogConfig, LogFormat};
