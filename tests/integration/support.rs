use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use sysmap::core::process_detail::{MemoryInfo, ProcessDetail};
use sysmap::core::telemetry::{
    Connection, CpuSample, DiskUsage, HostInfo, LoadAverage, MemorySample, Partition,
    ProcessRecord, TelemetryProvider,
};
use sysmap::{Result, SysmapError};

/// Scripted telemetry for exercising builders without touching the host
pub struct FakeTelemetry {
    pub host: HostInfo,
    pub cpu: CpuSample,
    pub memory: MemorySample,
    /// `None` usage simulates a partition whose usage read is denied
    pub partitions: Vec<(String, String, Option<DiskUsage>)>,
    pub processes: Vec<ProcessRecord>,
    pub connections: Vec<Connection>,
    pub details: HashMap<u32, ProcessDetail>,
    pub fail_processes: bool,
    pub fail_network: bool,
    pub fail_host: bool,
    pub hardware_delay: Option<Duration>,
    pub process_delay: Option<Duration>,
}

impl Default for FakeTelemetry {
    fn default() -> Self {
        Self {
            host: HostInfo {
                hostname: "testbox".to_string(),
                os: "Linux-6.1-x86_64".to_string(),
                boot_time: 1_700_000_000,
            },
            cpu: CpuSample {
                cores: 1,
                usage_percent: 3.0,
                load: Some(LoadAverage {
                    one: 0.5,
                    five: 0.4,
                    fifteen: 0.3,
                }),
                freq_mhz: Some(2_400),
            },
            memory: MemorySample {
                total: 8_000_000_000,
                used: 2_000_000_000,
                available: 6_000_000_000,
            },
            partitions: vec![(
                "/".to_string(),
                "ext4".to_string(),
                Some(DiskUsage {
                    total: 100_000_000_000,
                    available: 40_000_000_000,
                }),
            )],
            processes: Vec::new(),
            connections: Vec::new(),
            details: HashMap::new(),
            fail_processes: false,
            fail_network: false,
            fail_host: false,
            hardware_delay: None,
            process_delay: None,
        }
    }
}

impl FakeTelemetry {
    pub fn with_processes(mut self, processes: Vec<ProcessRecord>) -> Self {
        self.processes = processes;
        self
    }

    pub fn with_connections(mut self, connections: Vec<Connection>) -> Self {
        self.connections = connections;
        self
    }
}

pub fn process(pid: u32, ppid: Option<u32>, name: &str) -> ProcessRecord {
    ProcessRecord {
        pid,
        ppid,
        name: Some(name.to_string()),
        cpu_percent: Some(0.0),
        rss_bytes: Some(10_000_000),
        user: Some("tester".to_string()),
    }
}

pub fn connection(remote: &str, pid: Option<u32>) -> Connection {
    Connection {
        remote: Some(remote.parse().expect("valid socket address")),
        pid,
    }
}

pub fn detail(pid: u32, name: &str) -> ProcessDetail {
    ProcessDetail {
        pid,
        ppid: Some(1),
        name: name.to_string(),
        exe: format!("/usr/bin/{}", name),
        cmdline: vec![name.to_string(), "--flag".to_string()],
        username: "tester".to_string(),
        cpu_percent: 0.0,
        memory_info: MemoryInfo {
            rss: 10_000_000,
            vms: 50_000_000,
        },
        cwd: "/".to_string(),
        create_time: 1_700_000_100,
    }
}

impl TelemetryProvider for FakeTelemetry {
    fn host(&self) -> Result<HostInfo> {
        if let Some(delay) = self.hardware_delay {
            thread::sleep(delay);
        }
        if self.fail_host {
            return Err(SysmapError::platform_unsupported("no hostname"));
        }
        Ok(self.host.clone())
    }

    fn cpu(&self) -> Result<CpuSample> {
        Ok(self.cpu.clone())
    }

    fn memory(&self) -> Result<MemorySample> {
        Ok(self.memory)
    }

    fn partitions(&self) -> Result<Vec<Partition>> {
        Ok(self
            .partitions
            .iter()
            .map(|(mount_point, fstype, usage)| Partition {
                mount_point: mount_point.clone(),
                fstype: fstype.clone(),
                usage: (*usage).ok_or_else(|| SysmapError::permission_denied(mount_point.clone())),
            })
            .collect())
    }

    fn process_table(&self) -> Result<Vec<ProcessRecord>> {
        if let Some(delay) = self.process_delay {
            thread::sleep(delay);
        }
        if self.fail_processes {
            return Err(SysmapError::permission_denied("process table"));
        }
        Ok(self.processes.clone())
    }

    fn connections(&self) -> Result<Vec<Connection>> {
        if self.fail_network {
            return Err(SysmapError::permission_denied("connection table"));
        }
        Ok(self.connections.clone())
    }

    fn process_detail(&self, pid: u32) -> Result<ProcessDetail> {
        self.details
            .get(&pid)
            .cloned()
            .ok_or_else(|| SysmapError::not_found(format!("process not found (pid={})", pid)))
    }
}
