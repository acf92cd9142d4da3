use std::net::SocketAddr;
use std::time::Duration;

use netstat2::{get_sockets_info, AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo};
use parking_lot::{Mutex, MutexGuard};
use sysinfo::{Disks, Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};

use super::{
    Connection, CpuSample, DiskUsage, HostInfo, LoadAverage, MemorySample, Partition,
    ProcessRecord, TelemetryProvider,
};
use crate::core::config::DEFAULT_PROBE_TIMEOUT_MS;
use crate::core::process_detail::{MemoryInfo, ProcessDetail};
use crate::error::{Result, SysmapError};

/// Telemetry read from the running host.
///
/// The `System` handle is kept across calls only because sysinfo computes CPU
/// percentages as a delta against its previous refresh: the first reading is
/// 0.0, later readings cover the interval since the last refresh by any caller.
///
/// A probe abandoned by the assembler may still hold the handle, so every
/// acquisition is bounded by `lock_timeout`.
pub struct SystemTelemetry {
    system: Mutex<System>,
    lock_timeout: Duration,
}

impl SystemTelemetry {
    pub fn new() -> Self {
        Self::with_lock_timeout(Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS))
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            system: Mutex::new(System::new()),
            lock_timeout,
        }
    }

    fn lock_system(&self) -> Result<MutexGuard<'_, System>> {
        self.system.try_lock_for(self.lock_timeout).ok_or_else(|| {
            SysmapError::timeout(format!(
                "system handle busy for more than {:?}",
                self.lock_timeout
            ))
        })
    }
}

impl Default for SystemTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_description() -> String {
    System::long_os_version()
        .unwrap_or_else(|| format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH))
}

/// statvfs failures leave sysinfo disks in the list with zeroed sizes
fn partition_usage(mount_point: &str, total: u64, available: u64) -> Result<DiskUsage> {
    if total == 0 {
        return Err(SysmapError::permission_denied(format!(
            "usage of {} is not readable",
            mount_point
        )));
    }
    Ok(DiskUsage { total, available })
}

fn user_name(users: &Users, process: &sysinfo::Process) -> Option<String> {
    process
        .user_id()
        .and_then(|uid| users.get_user_by_id(uid))
        .map(|user| user.name().to_string())
}

impl TelemetryProvider for SystemTelemetry {
    fn host(&self) -> Result<HostInfo> {
        let hostname = System::host_name()
            .ok_or_else(|| SysmapError::platform_unsupported("hostname is not available"))?;

        Ok(HostInfo {
            hostname,
            os: platform_description(),
            boot_time: System::boot_time(),
        })
    }

    fn cpu(&self) -> Result<CpuSample> {
        let mut system = self.lock_system()?;
        system.refresh_cpu_all();

        let cpus = system.cpus();
        let freq_mhz = cpus.first().map(|cpu| cpu.frequency()).filter(|&mhz| mhz > 0);

        // Windows has no load average; sysinfo reports zeros there
        let load = if cfg!(windows) {
            None
        } else {
            let load = System::load_average();
            Some(LoadAverage {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            })
        };

        Ok(CpuSample {
            cores: cpus.len().max(1),
            usage_percent: f64::from(system.global_cpu_usage()),
            load,
            freq_mhz,
        })
    }

    fn memory(&self) -> Result<MemorySample> {
        let mut system = self.lock_system()?;
        system.refresh_memory();

        Ok(MemorySample {
            total: system.total_memory(),
            used: system.used_memory(),
            available: system.available_memory(),
        })
    }

    fn partitions(&self) -> Result<Vec<Partition>> {
        let disks = Disks::new_with_refreshed_list();

        Ok(disks
            .list()
            .iter()
            .map(|disk| {
                let mount_point = disk.mount_point().to_string_lossy().to_string();
                Partition {
                    usage: partition_usage(
                        &mount_point,
                        disk.total_space(),
                        disk.available_space(),
                    ),
                    fstype: disk.file_system().to_string_lossy().to_string(),
                    mount_point,
                }
            })
            .collect())
    }

    fn process_table(&self) -> Result<Vec<ProcessRecord>> {
        let users = Users::new_with_refreshed_list();
        let mut system = self.lock_system()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet),
        );

        let mut records: Vec<ProcessRecord> = system
            .processes()
            .values()
            // Linux exposes threads as tasks; only real processes become nodes
            .filter(|process| process.thread_kind().is_none())
            .map(|process| {
                let name = process.name().to_string_lossy().to_string();
                ProcessRecord {
                    pid: process.pid().as_u32(),
                    ppid: process.parent().map(|pid| pid.as_u32()),
                    name: (!name.is_empty()).then_some(name),
                    cpu_percent: Some(process.cpu_usage()),
                    rss_bytes: Some(process.memory()),
                    user: user_name(&users, process),
                }
            })
            .collect();

        records.sort_by_key(|record| record.pid);
        Ok(records)
    }

    fn connections(&self) -> Result<Vec<Connection>> {
        let sockets = get_sockets_info(
            AddressFamilyFlags::IPV4 | AddressFamilyFlags::IPV6,
            ProtocolFlags::TCP | ProtocolFlags::UDP,
        )
        .map_err(|e| {
            SysmapError::platform_unsupported(format!("connection table unavailable: {}", e))
        })?;

        Ok(sockets
            .into_iter()
            .map(|socket| {
                let remote = match &socket.protocol_socket_info {
                    ProtocolSocketInfo::Tcp(tcp) => {
                        Some(SocketAddr::new(tcp.remote_addr, tcp.remote_port))
                    }
                    ProtocolSocketInfo::Udp(_) => None,
                };
                Connection {
                    remote,
                    pid: socket.associated_pids.first().copied(),
                }
            })
            .collect())
    }

    fn process_detail(&self, pid: u32) -> Result<ProcessDetail> {
        let users = Users::new_with_refreshed_list();
        let target = Pid::from_u32(pid);

        // One refresh of one pid under the lock: every field below comes from it
        let mut system = self.lock_system()?;
        let seen_before = system.process(target).is_some();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[target]),
            true,
            ProcessRefreshKind::everything(),
        );

        // Thread ids resolve too, as /proc/<tid> does on Linux
        let process = system.process(target).ok_or_else(|| {
            if seen_before {
                SysmapError::process_vanished(format!("process exited (pid={})", pid))
            } else {
                SysmapError::not_found(format!(
                    "process no longer exists or is not accessible (pid={})",
                    pid
                ))
            }
        })?;

        Ok(ProcessDetail {
            pid,
            ppid: process.parent().map(|parent| parent.as_u32()),
            name: process.name().to_string_lossy().to_string(),
            exe: process
                .exe()
                .map(|path| path.to_string_lossy().to_string())
                .unwrap_or_default(),
            cmdline: process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().to_string())
                .collect(),
            username: user_name(&users, process).unwrap_or_else(|| "?".to_string()),
            cpu_percent: f64::from(process.cpu_usage()),
            memory_info: MemoryInfo {
                rss: process.memory(),
                vms: process.virtual_memory(),
            },
            cwd: process
                .cwd()
                .map(|path| path.to_string_lossy().to_string())
                .unwrap_or_default(),
            create_time: process.start_time(),
        })
    }
}
