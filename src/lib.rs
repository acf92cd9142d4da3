// SysMap Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, SysmapError};

// Module declarations
pub mod commands;
pub mod core;
pub mod server;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::telemetry::{SystemTelemetry, TelemetryProvider};
pub use crate::core::topology::{TopologyAssembler, TopologySnapshot};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
