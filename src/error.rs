use std::io;
use thiserror::Error;

/// Custom error type for SysMap
#[derive(Error, Debug)]
pub enum SysmapError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Process vanished: {0}")]
    ProcessVanished(String),

    #[error("Unsupported on this platform: {0}")]
    PlatformUnsupported(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Probe timed out: {0}")]
    Timeout(String),
}

/// Result type alias for SysMap
pub type Result<T> = std::result::Result<T, SysmapError>;

impl SysmapError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SysmapError::Config(msg.into())
    }

    /// Create a permission denied error
    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        SysmapError::PermissionDenied(msg.into())
    }

    pub fn process_vanished<S: Into<String>>(msg: S) -> Self {
        SysmapError::ProcessVanished(msg.into())
    }

    pub fn platform_unsupported<S: Into<String>>(msg: S) -> Self {
        SysmapError::PlatformUnsupported(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SysmapError::NotFound(msg.into())
    }

    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        SysmapError::Timeout(msg.into())
    }

    /// Whether a graph builder should drop the affected item without
    /// flagging its subsystem as degraded.
    pub fn is_silent_skip(&self) -> bool {
        matches!(
            self,
            SysmapError::PermissionDenied(_) | SysmapError::ProcessVanished(_)
        )
    }
}
