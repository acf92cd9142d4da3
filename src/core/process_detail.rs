//! Single-process detail lookup.
//!
//! Unlike topology assembly, which tolerates fields read at slightly different
//! moments, a detail record is taken from one refresh of one process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::telemetry::TelemetryProvider;
use crate::error::{Result, SysmapError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    /// Resident set size in bytes
    pub rss: u64,
    /// Virtual memory size in bytes
    pub vms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDetail {
    pub pid: u32,
    pub ppid: Option<u32>,
    pub name: String,
    /// Empty when the executable path cannot be read
    pub exe: String,
    pub cmdline: Vec<String>,
    pub username: String,
    pub cpu_percent: f64,
    pub memory_info: MemoryInfo,
    /// Empty when the working directory cannot be read
    pub cwd: String,
    /// Unix timestamp
    pub create_time: u64,
}

pub struct ProcessDetailProvider {
    telemetry: Arc<dyn TelemetryProvider>,
}

impl ProcessDetailProvider {
    pub fn new(telemetry: Arc<dyn TelemetryProvider>) -> Self {
        Self { telemetry }
    }

    /// Look up one process. Vanished or inaccessible processes are reported
    /// as `SysmapError::NotFound` so callers can answer 404.
    pub fn lookup(&self, pid: u32) -> Result<ProcessDetail> {
        match self.telemetry.process_detail(pid) {
            Err(e) if e.is_silent_skip() => {
                log::debug!("Process detail lookup for pid {} failed: {}", pid, e);
                Err(SysmapError::not_found(e.to_string()))
            }
            other => other,
        }
    }
}
