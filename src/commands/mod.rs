// Command handlers module
pub mod config;
pub mod process;
pub mod serve;
pub mod topology;
pub mod version;

// Re-exports for cleaner imports
pub use process::execute as process;
pub use serve::execute as serve;
pub use topology::execute as topology;
pub use version::execute as version;
