//! Raw host telemetry.
//!
//! Graph builders never talk to the OS directly; they read through a
//! [`TelemetryProvider`]. [`SystemTelemetry`] is the production provider,
//! backed by `sysinfo` for hardware and processes and `netstat2` for the
//! connection table.

mod system;

pub use system::SystemTelemetry;

use std::net::SocketAddr;

use crate::core::process_detail::ProcessDetail;
use crate::error::Result;

/// Static facts about the host
#[derive(Debug, Clone, PartialEq)]
pub struct HostInfo {
    pub hostname: String,
    pub os: String,
    /// Unix timestamp
    pub boot_time: u64,
}

impl HostInfo {
    pub fn unknown() -> Self {
        Self {
            hostname: "unknown".to_string(),
            os: std::env::consts::OS.to_string(),
            boot_time: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuSample {
    /// Logical CPU count
    pub cores: usize,
    pub usage_percent: f64,
    /// `None` where the platform has no load average
    pub load: Option<LoadAverage>,
    /// `None` where the frequency cannot be read
    pub freq_mhz: Option<u64>,
}

impl Default for CpuSample {
    fn default() -> Self {
        Self {
            cores: 1,
            usage_percent: 0.0,
            load: None,
            freq_mhz: None,
        }
    }
}

/// Memory counters in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemorySample {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskUsage {
    pub total: u64,
    pub available: u64,
}

/// A mounted partition. `usage` is probed per partition so that one denied
/// mount does not hide the others.
#[derive(Debug)]
pub struct Partition {
    pub mount_point: String,
    pub fstype: String,
    pub usage: Result<DiskUsage>,
}

/// One row of the process table, captured in a single enumeration.
/// Fields are `None` when they could not be read for that process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: Option<u32>,
    pub name: Option<String>,
    pub cpu_percent: Option<f32>,
    pub rss_bytes: Option<u64>,
    pub user: Option<String>,
}

/// One inet-family socket
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// `None` for listening and unconnected sockets
    pub remote: Option<SocketAddr>,
    /// Owning process, when the OS lets us see it
    pub pid: Option<u32>,
}

impl Connection {
    /// The peer address, if this socket actually has one
    pub fn remote_ip(&self) -> Option<std::net::IpAddr> {
        self.remote
            .filter(|addr| !addr.ip().is_unspecified() && addr.port() != 0)
            .map(|addr| addr.ip())
    }
}

/// Source of live host state.
///
/// Every method is an independent, synchronous query; implementations must
/// not cache graph data between calls.
pub trait TelemetryProvider: Send + Sync {
    fn host(&self) -> Result<HostInfo>;

    fn cpu(&self) -> Result<CpuSample>;

    fn memory(&self) -> Result<MemorySample>;

    fn partitions(&self) -> Result<Vec<Partition>>;

    fn process_table(&self) -> Result<Vec<ProcessRecord>>;

    fn connections(&self) -> Result<Vec<Connection>>;

    /// Detail for a single process, read at one instant. Returns
    /// `SysmapError::NotFound` when the pid does not exist or is inaccessible.
    fn process_detail(&self, pid: u32) -> Result<ProcessDetail>;
}
