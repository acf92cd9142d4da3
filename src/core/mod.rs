// Core business logic module

pub mod config;
pub mod process_detail;
pub mod telemetry;
pub mod topology;

// Re-export commonly used items
pub use config::Config;
pub use process_detail::{MemoryInfo, ProcessDetail, ProcessDetailProvider};
pub use telemetry::{SystemTelemetry, TelemetryProvider};
pub use topology::{TopologyAssembler, TopologySnapshot};
